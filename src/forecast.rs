//! 预测序列的统计与图表几何
//!
//! 图表以 SVG 绘制，这里只负责把数据映射到坐标。

use cleanair_shared::ForecastPoint;

/// 预测序列摘要
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastStats {
    /// 平均值，保留一位小数
    pub average: f64,
    pub peak: f64,
    pub lowest: f64,
}

impl ForecastStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        let average = (sum / values.len() as f64 * 10.0).round() / 10.0;
        let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let lowest = values.iter().copied().fold(f64::INFINITY, f64::min);
        Some(Self {
            average,
            peak,
            lowest,
        })
    }

    pub fn from_series(points: &[ForecastPoint]) -> Option<Self> {
        let values: Vec<f64> = points.iter().map(|p| p.pm25).collect();
        Self::from_values(&values)
    }

    /// 按平均值给出的预测解读
    pub fn analysis(&self) -> &'static str {
        if self.average > 150.0 {
            "Poor air quality expected. Consider limiting outdoor activities and using air purifiers."
        } else if self.average > 100.0 {
            "Moderate air quality. Sensitive groups should take precautions."
        } else {
            "Good to moderate air quality expected. Generally safe for outdoor activities."
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// 绘图区边距
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartFrame {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for ChartFrame {
    fn default() -> Self {
        Self {
            width: 720.0,
            height: 320.0,
            left: 48.0,
            right: 16.0,
            top: 16.0,
            bottom: 40.0,
        }
    }
}

impl ChartFrame {
    fn plot_width(&self) -> f64 {
        self.width - self.left - self.right
    }

    fn plot_height(&self) -> f64 {
        self.height - self.top - self.bottom
    }
}

/// 一条预测曲线及其置信带在 SVG 中的几何
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGeometry {
    pub frame: ChartFrame,
    pub y_max: f64,
    pub line: Vec<ChartPoint>,
    /// 上界从左到右，再下界从右到左，构成闭合多边形
    pub band: Vec<ChartPoint>,
    pub x_ticks: Vec<AxisTick>,
    pub y_ticks: Vec<AxisTick>,
}

const X_TICK_TARGET: usize = 6;
const Y_TICK_COUNT: usize = 4;

impl ChartGeometry {
    pub fn build(points: &[ForecastPoint], frame: ChartFrame) -> Self {
        let raw_max = points
            .iter()
            .map(|p| p.confidence_upper.max(p.pm25))
            .fold(0.0, f64::max);
        // 向上取整到 10 的倍数
        let y_max = ((raw_max / 10.0).ceil() * 10.0).max(10.0);

        let n = points.len();
        let x_at = |i: usize| -> f64 {
            if n <= 1 {
                frame.left + frame.plot_width() / 2.0
            } else {
                frame.left + frame.plot_width() * i as f64 / (n - 1) as f64
            }
        };
        let y_at = |v: f64| -> f64 { frame.top + frame.plot_height() * (1.0 - v / y_max) };

        let line = points
            .iter()
            .enumerate()
            .map(|(i, p)| ChartPoint {
                x: x_at(i),
                y: y_at(p.pm25),
            })
            .collect();

        let upper = points.iter().enumerate().map(|(i, p)| ChartPoint {
            x: x_at(i),
            y: y_at(p.confidence_upper),
        });
        let lower = points.iter().enumerate().rev().map(|(i, p)| ChartPoint {
            x: x_at(i),
            y: y_at(p.confidence_lower),
        });
        let band = upper.chain(lower).collect();

        let step = (n / X_TICK_TARGET).max(1);
        let x_ticks = points
            .iter()
            .enumerate()
            .step_by(step)
            .map(|(i, p)| AxisTick {
                position: x_at(i),
                label: p.timestamp.format_time(),
            })
            .collect();

        let y_ticks = (0..=Y_TICK_COUNT)
            .map(|k| {
                let value = y_max * k as f64 / Y_TICK_COUNT as f64;
                AxisTick {
                    position: y_at(value),
                    label: format!("{}", value.round() as i64),
                }
            })
            .collect();

        Self {
            frame,
            y_max,
            line,
            band,
            x_ticks,
            y_ticks,
        }
    }
}

/// SVG `points` 属性
pub fn svg_points(points: &[ChartPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{:.1},{:.1}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}
