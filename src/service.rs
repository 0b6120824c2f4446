//! 领域服务
//!
//! 每个后端操作对应一个方法，输入原样转发，无重试、无缓存、无去重。

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::session::Session;
use cleanair_shared::protocol::{
    CheckAlertsRequest, CurrentAqiRequest, ForecastRequest, GetProfileRequest,
    HistoricalAqiRequest, ListAlertsRequest, LoginRequest, MarkAlertReadRequest,
    MarkAllAlertsReadRequest, RegisterRequest, RegisterResponse, SetThresholdRequest,
    StationsRequest, UpdateProfileRequest,
};
use cleanair_shared::{
    Alert, CheckAlertsResponse, CurrentAqiResponse, ForecastSeries, HistoricalResponse,
    MessageResponse, ProfileResponse, Station, UpdateProfileResponse, UserInfo,
};

impl<C: HttpClient> ApiClient<C> {
    // =========================================================
    // Auth
    // =========================================================

    pub async fn register(&self, req: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.send(req).await.map_err(|e| e.in_op("auth.register"))
    }

    /// 登录并建立会话
    ///
    /// 后端未返回用户记录时，以登录邮箱构造一份。
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<Session> {
        let req = LoginRequest::new(email, password);
        let token = self.send(&req).await.map_err(|e| e.in_op("auth.login"))?;

        let user = token.user.unwrap_or_else(|| UserInfo {
            email: email.to_string(),
            full_name: None,
        });
        let session = Session {
            token: token.access_token,
            user: Some(user),
        };
        self.session().begin(&session)?;
        log::info!("signed in as {}", email);
        Ok(session)
    }

    pub fn logout(&self) {
        self.session().end();
    }

    // =========================================================
    // Users
    // =========================================================

    pub async fn profile(&self) -> ClientResult<ProfileResponse> {
        self.send(&GetProfileRequest).await.map_err(|e| e.in_op("user.profile"))
    }

    /// 提交档案，返回服务端计算的风险评估
    pub async fn update_profile(
        &self,
        req: &UpdateProfileRequest,
    ) -> ClientResult<UpdateProfileResponse> {
        self.send(req).await.map_err(|e| e.in_op("user.update_profile"))
    }

    // =========================================================
    // AQI
    // =========================================================

    pub async fn current_aqi(&self, req: &CurrentAqiRequest) -> ClientResult<CurrentAqiResponse> {
        self.send(req).await.map_err(|e| e.in_op("aqi.current"))
    }

    pub async fn stations(&self) -> ClientResult<Vec<Station>> {
        self.send(&StationsRequest)
            .await
            .map(|r| r.stations)
            .map_err(|e| e.in_op("aqi.stations"))
    }

    pub async fn historical(&self, station_id: &str, days: u32) -> ClientResult<HistoricalResponse> {
        let req = HistoricalAqiRequest {
            station_id: station_id.to_string(),
            days,
        };
        self.send(&req)
            .await
            .map_err(|e| e.in_op_with("aqi.historical", station_id))
    }

    // =========================================================
    // Forecast
    // =========================================================

    pub async fn forecast(&self, city: &str, hours: u32) -> ClientResult<ForecastSeries> {
        self.send(&ForecastRequest::new(city, hours))
            .await
            .map_err(|e| e.in_op_with("forecast.get", city))
    }

    // =========================================================
    // Alerts
    // =========================================================

    pub async fn alerts(&self) -> ClientResult<Vec<Alert>> {
        self.send(&ListAlertsRequest)
            .await
            .map(|r| r.alerts)
            .map_err(|e| e.in_op("alerts.list"))
    }

    pub async fn unread_alerts(&self) -> ClientResult<Vec<Alert>> {
        let mut alerts = self.alerts().await?;
        alerts.retain(|a| !a.is_read);
        Ok(alerts)
    }

    pub async fn set_threshold(&self, threshold: u32) -> ClientResult<MessageResponse> {
        self.send(&SetThresholdRequest { threshold })
            .await
            .map_err(|e| e.in_op_with("alerts.set_threshold", threshold.to_string()))
    }

    pub async fn check_alerts(&self) -> ClientResult<CheckAlertsResponse> {
        self.send(&CheckAlertsRequest).await.map_err(|e| e.in_op("alerts.check"))
    }

    pub async fn mark_read(&self, id: &str) -> ClientResult<MessageResponse> {
        self.send(&MarkAlertReadRequest { id: id.to_string() })
            .await
            .map_err(|e| e.in_op_with("alerts.mark_read", id))
    }

    pub async fn mark_all_read(&self) -> ClientResult<MessageResponse> {
        self.send(&MarkAllAlertsReadRequest)
            .await
            .map_err(|e| e.in_op("alerts.mark_all_read"))
    }
}
