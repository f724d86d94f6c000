//! 平面激光扫描消息

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 一帧平面激光扫描
///
/// 字段语义与常见激光雷达驱动的输出对齐：`ranges[i]` 对应角度
/// `angle_min + i * angle_increment`（弧度），距离单位为米。
/// 驱动通常用 `Inf`/`NaN` 或窗口外的值表示"无回波"，消费方应当通过
/// [`RangeScan::min_range`] 这类过滤接口读取，而不是直接索引 `ranges`。
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RangeScan {
    /// 起始角度（弧度）
    pub angle_min: f32,
    /// 相邻读数的角度步长（弧度）
    pub angle_increment: f32,
    /// 有效距离下限（米），等于或低于此值的读数视为无效
    pub range_min: f32,
    /// 有效距离上限（米），等于或高于此值的读数视为无效
    pub range_max: f32,
    /// 距离读数（米），按角度递增排列
    pub ranges: Vec<f32>,
}

impl RangeScan {
    /// 第 `index` 个读数对应的角度（弧度）
    pub fn angle_of(&self, index: usize) -> f32 {
        self.angle_min + index as f32 * self.angle_increment
    }

    /// 最近的有效障碍距离（米）
    ///
    /// 过滤掉 `(range_min, range_max)` 窗口外的读数和非有限值。
    /// 全部读数无效（或扫描为空）时返回 `None`。
    pub fn min_range(&self) -> Option<f32> {
        self.ranges
            .iter()
            .copied()
            .filter(|r| r.is_finite() && *r > self.range_min && *r < self.range_max)
            .fold(None, |acc, r| match acc {
                Some(m) if m <= r => Some(m),
                _ => Some(r),
            })
    }

    /// 读数个数
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// 是否不含任何读数
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
