//! AQI 分级
//!
//! 六个互不重叠的区间覆盖全部取值：
//! [0,50] [51,100] [101,150] [151,200] [201,300] [301,∞)

use cleanair_shared::StationReading;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthyForSensitiveGroups,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    pub fn from_aqi(aqi: u32) -> Self {
        match aqi {
            0..=50 => AqiCategory::Good,
            51..=100 => AqiCategory::Moderate,
            101..=150 => AqiCategory::UnhealthyForSensitiveGroups,
            151..=200 => AqiCategory::Unhealthy,
            201..=300 => AqiCategory::VeryUnhealthy,
            _ => AqiCategory::Hazardous,
        }
    }

    pub fn level(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// 背景色 class
    pub fn color(&self) -> &'static str {
        match self {
            AqiCategory::Good => "bg-green-500",
            AqiCategory::Moderate => "bg-yellow-500",
            AqiCategory::UnhealthyForSensitiveGroups => "bg-orange-500",
            AqiCategory::Unhealthy => "bg-red-500",
            AqiCategory::VeryUnhealthy => "bg-purple-500",
            AqiCategory::Hazardous => "bg-red-800",
        }
    }

    pub fn text_color(&self) -> &'static str {
        match self {
            AqiCategory::Good => "text-green-500",
            AqiCategory::Moderate => "text-yellow-500",
            AqiCategory::UnhealthyForSensitiveGroups => "text-orange-500",
            AqiCategory::Unhealthy => "text-red-500",
            AqiCategory::VeryUnhealthy => "text-purple-500",
            AqiCategory::Hazardous => "text-red-800",
        }
    }

    /// 地图标记颜色（CSS 颜色值）
    pub fn marker_color(&self) -> &'static str {
        match self {
            AqiCategory::Good => "#22c55e",
            AqiCategory::Moderate => "#eab308",
            AqiCategory::UnhealthyForSensitiveGroups => "#f97316",
            AqiCategory::Unhealthy => "#ef4444",
            AqiCategory::VeryUnhealthy => "#a855f7",
            AqiCategory::Hazardous => "#800000",
        }
    }

    pub fn range_label(&self) -> &'static str {
        match self {
            AqiCategory::Good => "0-50",
            AqiCategory::Moderate => "51-100",
            AqiCategory::UnhealthyForSensitiveGroups => "101-150",
            AqiCategory::Unhealthy => "151-200",
            AqiCategory::VeryUnhealthy => "201-300",
            AqiCategory::Hazardous => "301+",
        }
    }

    /// AQI 指南中的简短说明
    pub fn guidance(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Air quality is satisfactory.",
            AqiCategory::Moderate => "Acceptable; unusually sensitive people should take care.",
            AqiCategory::UnhealthyForSensitiveGroups => {
                "Sensitive groups may experience health effects."
            }
            AqiCategory::Unhealthy => "Reduce outdoor activities.",
            AqiCategory::VeryUnhealthy => "Avoid outdoor activities.",
            AqiCategory::Hazardous => "Health emergency conditions.",
        }
    }

    pub fn health_advice(&self) -> &'static str {
        match self {
            AqiCategory::Good => "Air quality is good. Perfect for outdoor activities!",
            AqiCategory::Moderate => "Air quality is acceptable. Enjoy outdoor activities.",
            AqiCategory::UnhealthyForSensitiveGroups => {
                "Sensitive groups should reduce prolonged outdoor exposure."
            }
            AqiCategory::Unhealthy => {
                "Everyone should reduce outdoor activities. Consider masks if outside."
            }
            AqiCategory::VeryUnhealthy => "Avoid outdoor activities. Use air purifiers indoors.",
            AqiCategory::Hazardous => "Emergency conditions. Stay indoors with windows closed.",
        }
    }
}

pub fn category(aqi: u32) -> AqiCategory {
    AqiCategory::from_aqi(aqi)
}

/// 某城市的健康建议文本
///
/// `stations` 为 None 表示数据仍在加载。
pub fn health_advice_for(city: &str, stations: Option<&[StationReading]>) -> &'static str {
    let Some(stations) = stations else {
        return "Loading air quality data...";
    };
    match stations.iter().find(|s| s.city == city) {
        Some(reading) => category(reading.aqi).health_advice(),
        None => "No data available for this city.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cleanair_shared::ApiTimestamp;

    fn reading(city: &str, aqi: u32) -> StationReading {
        StationReading {
            station_id: format!("st-{}", city),
            city: city.to_string(),
            station_name: format!("{} Central", city),
            aqi,
            pm25: 0.0,
            latitude: 0.0,
            longitude: 0.0,
            last_updated: ApiTimestamp::parse("2024-11-02T10:00:00").unwrap(),
        }
    }

    #[test]
    fn test_band_boundaries() {
        let cases = [
            (0, AqiCategory::Good),
            (50, AqiCategory::Good),
            (51, AqiCategory::Moderate),
            (100, AqiCategory::Moderate),
            (101, AqiCategory::UnhealthyForSensitiveGroups),
            (150, AqiCategory::UnhealthyForSensitiveGroups),
            (151, AqiCategory::Unhealthy),
            (200, AqiCategory::Unhealthy),
            (201, AqiCategory::VeryUnhealthy),
            (300, AqiCategory::VeryUnhealthy),
            (301, AqiCategory::Hazardous),
            (u32::MAX, AqiCategory::Hazardous),
        ];
        for (aqi, expected) in cases {
            assert_eq!(category(aqi), expected, "aqi {}", aqi);
        }
    }

    #[test]
    fn test_partition_is_total_and_monotonic() {
        let mut previous = 0usize;
        for aqi in 0..=600 {
            let index = AqiCategory::ALL
                .iter()
                .position(|c| *c == category(aqi))
                .unwrap();
            assert!(index >= previous);
            previous = index;
        }
        assert_eq!(previous, AqiCategory::ALL.len() - 1);
    }

    #[test]
    fn test_each_band_has_distinct_level_and_color() {
        let levels: std::collections::HashSet<_> =
            AqiCategory::ALL.iter().map(|c| c.level()).collect();
        let colors: std::collections::HashSet<_> =
            AqiCategory::ALL.iter().map(|c| c.color()).collect();
        assert_eq!(levels.len(), 6);
        assert_eq!(colors.len(), 6);
    }

    #[test]
    fn test_scenario_islamabad_and_lahore() {
        let stations = [reading("Islamabad", 40), reading("Lahore", 160)];
        assert_eq!(category(stations[0].aqi).level(), "Good");
        assert_eq!(category(stations[1].aqi).level(), "Unhealthy");
    }

    #[test]
    fn test_health_advice_for_city() {
        let stations = vec![reading("Lahore", 160)];
        assert_eq!(
            health_advice_for("Lahore", Some(&stations)),
            "Everyone should reduce outdoor activities. Consider masks if outside."
        );
        assert_eq!(
            health_advice_for("Quetta", Some(&stations)),
            "No data available for this city."
        );
        assert_eq!(health_advice_for("Lahore", None), "Loading air quality data...");
    }
}
