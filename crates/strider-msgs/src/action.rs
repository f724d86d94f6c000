//! 决策输出消息

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 决策评分向量
///
/// 决策方（通常是一个推理引擎）对一组离散动作给出的评分。本 crate
/// 不解释各分量的语义——评分的含义由决策方和运动规划方自行约定，
/// 这里只保证顺序稳定。
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionVector {
    /// 各动作的评分，顺序有意义
    pub scores: Vec<f32>,
}

impl ActionVector {
    /// 从评分序列创建
    pub fn new(scores: Vec<f32>) -> Self {
        Self { scores }
    }

    /// 评分最高的动作下标
    ///
    /// 空向量返回 `None`；并列时取靠前的下标。
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (i, &s) in self.scores.iter().enumerate() {
            match best {
                Some((_, b)) if b >= s => {}
                _ => best = Some((i, s)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// 评分个数
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax() {
        let v = ActionVector::new(vec![0.2, 0.8, 0.1]);
        assert_eq!(v.argmax(), Some(1));
    }

    #[test]
    fn test_argmax_ties_take_first() {
        let v = ActionVector::new(vec![0.5, 0.5]);
        assert_eq!(v.argmax(), Some(0));
    }

    #[test]
    fn test_argmax_empty() {
        assert_eq!(ActionVector::default().argmax(), None);
    }
}
