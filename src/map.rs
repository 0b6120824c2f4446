//! 地图视口与瓦片计算
//!
//! Web Mercator 投影，瓦片来自公共 OSM 服务，不依赖地图 JS 库。

use cleanair_shared::{StationReading, is_all_cities};
use std::f64::consts::PI;

pub const TILE_SIZE: f64 = 256.0;
pub const TILE_URL_TEMPLATE: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const ATTRIBUTION: &str = "© OpenStreetMap contributors";

pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 30.3753,
    lng: 69.3451,
};
pub const DEFAULT_ZOOM: u8 = 6;
pub const CITY_ZOOM: u8 = 10;
pub const MIN_ZOOM: u8 = 2;
pub const MAX_ZOOM: u8 = 18;

// Mercator 在此纬度之外发散
const MAX_LATITUDE: f64 = 85.051_128_78;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn of(station: &StationReading) -> Self {
        Self {
            lat: station.latitude,
            lng: station.longitude,
        }
    }
}

/// 某缩放级别下的全局像素坐标
pub fn world_pixel(point: LatLng, zoom: u8) -> (f64, f64) {
    let scale = TILE_SIZE * f64::from(1u32 << zoom);
    let x = (point.lng + 180.0) / 360.0 * scale;
    let phi = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let y = (1.0 - (phi.tan() + 1.0 / phi.cos()).ln() / PI) / 2.0 * scale;
    (x, y)
}

pub fn tile_url(z: u8, x: u32, y: u32) -> String {
    TILE_URL_TEMPLATE
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}

/// 视口内的一张瓦片，`left`/`top` 为相对视口左上角的像素偏移
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub z: u8,
    pub x: u32,
    pub y: u32,
    pub left: f64,
    pub top: f64,
}

impl Tile {
    pub fn url(&self) -> String {
        tile_url(self.z, self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: u8,
    /// 最近一次定位到的城市
    focused: Option<String>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            focused: None,
        }
    }
}

impl Viewport {
    /// 选中具体城市时移动到该城市的站点
    ///
    /// 哨兵或找不到站点时保持当前视口，返回是否移动。
    pub fn recenter(&mut self, city: &str, stations: &[StationReading]) -> bool {
        if is_all_cities(city) {
            return false;
        }
        match stations.iter().find(|s| s.city == city) {
            Some(station) => {
                self.center = LatLng::of(station);
                self.zoom = CITY_ZOOM;
                true
            }
            None => false,
        }
    }

    /// 外部选择变化时调用，同一城市重复调用不动视口
    ///
    /// 站点刷新会再次触发，此时保留用户手动调整的缩放。
    pub fn focus(&mut self, city: &str, stations: &[StationReading]) -> bool {
        if is_all_cities(city) {
            self.focused = None;
            return false;
        }
        if self.focused.as_deref() == Some(city) {
            return false;
        }
        let moved = self.recenter(city, stations);
        if moved {
            self.focused = Some(city.to_string());
        }
        moved
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = self.zoom.saturating_sub(1).max(MIN_ZOOM);
    }

    /// 将坐标投影到宽 `width` 高 `height` 的视口内
    pub fn project(&self, point: LatLng, width: f64, height: f64) -> (f64, f64) {
        let (cx, cy) = world_pixel(self.center, self.zoom);
        let (px, py) = world_pixel(point, self.zoom);
        (px - cx + width / 2.0, py - cy + height / 2.0)
    }

    pub fn contains(&self, point: LatLng, width: f64, height: f64) -> bool {
        let (x, y) = self.project(point, width, height);
        (0.0..=width).contains(&x) && (0.0..=height).contains(&y)
    }

    /// 覆盖视口所需的瓦片，横向环绕，纵向越界的丢弃
    pub fn tiles(&self, width: f64, height: f64) -> Vec<Tile> {
        let count = 1i64 << self.zoom;
        let (cx, cy) = world_pixel(self.center, self.zoom);
        let origin_x = cx - width / 2.0;
        let origin_y = cy - height / 2.0;

        let first_x = (origin_x / TILE_SIZE).floor() as i64;
        let last_x = ((origin_x + width) / TILE_SIZE).ceil() as i64 - 1;
        let first_y = (origin_y / TILE_SIZE).floor() as i64;
        let last_y = ((origin_y + height) / TILE_SIZE).ceil() as i64 - 1;

        let mut tiles = Vec::new();
        for ty in first_y..=last_y {
            if ty < 0 || ty >= count {
                continue;
            }
            for tx in first_x..=last_x {
                tiles.push(Tile {
                    z: self.zoom,
                    x: tx.rem_euclid(count) as u32,
                    y: ty as u32,
                    left: tx as f64 * TILE_SIZE - origin_x,
                    top: ty as f64 * TILE_SIZE - origin_y,
                });
            }
        }
        tiles
    }
}
