//! 个人档案表单与风险评估展示

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::request::HttpClient;
use crate::state::StateCell;
use cleanair_shared::protocol::UpdateProfileRequest;
use cleanair_shared::{ProfileResponse, RiskAssessment, UpdateProfileResponse, UserProfile};

pub const AGE_RANGE: std::ops::RangeInclusive<u32> = 1..=120;
pub const OUTDOOR_HOURS_RANGE: std::ops::RangeInclusive<u32> = 0..=24;

pub const UPDATE_SUCCESS: &str = "Profile updated successfully!";
pub const UPDATE_FAILURE: &str = "Failed to update profile";
pub const LOAD_FAILURE: &str = "Failed to load profile";

/// 表单原始输入，数字字段保留文本以便用户编辑
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub age: String,
    pub daily_outdoor_hours: String,
    pub has_chronic_conditions: bool,
    pub is_smoker: bool,
}

impl ProfileForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            age: profile.age.map(|v| v.to_string()).unwrap_or_default(),
            daily_outdoor_hours: profile
                .daily_outdoor_hours
                .map(|v| v.to_string())
                .unwrap_or_default(),
            has_chronic_conditions: profile.has_chronic_conditions,
            is_smoker: profile.is_smoker,
        }
    }

    /// 校验并转为提交请求，失败时返回面向用户的提示
    pub fn to_update(&self) -> Result<UpdateProfileRequest, String> {
        let age = parse_in_range("Age", &self.age, AGE_RANGE)?;
        let daily_outdoor_hours = parse_in_range(
            "Daily outdoor hours",
            &self.daily_outdoor_hours,
            OUTDOOR_HOURS_RANGE,
        )?;
        Ok(UpdateProfileRequest {
            age,
            has_chronic_conditions: self.has_chronic_conditions,
            is_smoker: self.is_smoker,
            daily_outdoor_hours,
        })
    }
}

fn parse_in_range(
    label: &str,
    raw: &str,
    range: std::ops::RangeInclusive<u32>,
) -> Result<u32, String> {
    let value: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{} must be a whole number", label))?;
    if !range.contains(&value) {
        return Err(format!(
            "{} must be between {} and {}",
            label,
            range.start(),
            range.end()
        ));
    }
    Ok(value)
}

/// 表单上方的提示条
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileNotice {
    pub text: String,
    pub is_error: bool,
}

impl ProfileNotice {
    fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: false }
    }

    fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), is_error: true }
    }
}

/// 档案页状态：表单、风险评估、提示与保存中标志
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileState {
    pub form: ProfileForm,
    risk: Option<RiskAssessment>,
    notice: Option<ProfileNotice>,
    saving: bool,
}

impl ProfileState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn risk(&self) -> Option<&RiskAssessment> {
        self.risk.as_ref()
    }

    pub fn notice(&self) -> Option<&ProfileNotice> {
        self.notice.as_ref()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    /// 尚无档案时保持空表单
    pub fn finish_load(&mut self, result: ClientResult<ProfileResponse>) {
        match result {
            Ok(resp) => {
                if let Some(profile) = resp.profile {
                    self.form = ProfileForm::from_profile(&profile);
                    self.risk = profile.risk_assessment();
                }
            }
            Err(_) => self.notice = Some(ProfileNotice::error(LOAD_FAILURE)),
        }
    }

    /// 校验表单并进入保存中；校验失败或已在保存时返回 None
    pub fn begin_save(&mut self) -> Option<UpdateProfileRequest> {
        if self.saving {
            return None;
        }
        match self.form.to_update() {
            Ok(req) => {
                self.notice = None;
                self.saving = true;
                Some(req)
            }
            Err(msg) => {
                self.notice = Some(ProfileNotice::error(msg));
                None
            }
        }
    }

    pub fn finish_save(&mut self, result: ClientResult<UpdateProfileResponse>) {
        self.saving = false;
        match result {
            Ok(resp) => {
                self.notice = Some(ProfileNotice::success(UPDATE_SUCCESS));
                self.risk = Some(resp.risk_assessment);
            }
            Err(_) => self.notice = Some(ProfileNotice::error(UPDATE_FAILURE)),
        }
    }
}

pub async fn load_profile<C, S>(api: &ApiClient<C>, state: &S)
where
    C: HttpClient,
    S: StateCell<ProfileState>,
{
    let result = api.profile().await;
    if let Err(e) = &result {
        log::error!("Failed to load profile: {}", e);
    }
    state.update_with(|s| s.finish_load(result));
}

/// 提交表单，校验失败时不发请求
pub async fn save_profile<C, S>(api: &ApiClient<C>, state: &S)
where
    C: HttpClient,
    S: StateCell<ProfileState>,
{
    let Some(req) = state.update_with(ProfileState::begin_save).flatten() else {
        return;
    };
    let result = api.update_profile(&req).await;
    if let Err(e) = &result {
        log::error!("Failed to update profile: {}", e);
    }
    state.update_with(|s| s.finish_save(result));
}

/// 风险类别徽章样式
pub fn risk_badge_class(category: &str) -> &'static str {
    match category {
        "High Risk" => "bg-red-100 text-red-800",
        "Moderate Risk" => "bg-yellow-100 text-yellow-800",
        "Low Risk" => "bg-green-100 text-green-800",
        _ => "bg-blue-100 text-blue-800",
    }
}

pub fn risk_score_label(risk: &RiskAssessment) -> String {
    format!("{}/10", risk.score)
}
