//! 动作预算：单次运行的动作上限
//!
//! 上限在配置区间内随机抽取一次（每次运行重抽），计数只增不减，
//! 永不超过上限；仅在远端动作成功下发后消耗。

use rand::rngs::StdRng;
use rand::Rng;

/// 运行级动作计数器
#[derive(Clone, Debug)]
pub struct ActionBudget {
    taken: u32,
    ceiling: u32,
}

impl ActionBudget {
    /// 在 [lower, upper] 内抽取本次运行的上限
    pub fn draw(lower: u32, upper: u32, rng: &mut StdRng) -> Self {
        let (lower, upper) = if lower <= upper {
            (lower, upper)
        } else {
            (upper, lower)
        };
        Self {
            taken: 0,
            ceiling: rng.random_range(lower..=upper),
        }
    }

    /// 固定上限（测试用）
    pub fn fixed(ceiling: u32) -> Self {
        Self { taken: 0, ceiling }
    }

    pub fn exhausted(&self) -> bool {
        self.taken >= self.ceiling
    }

    /// 消耗一次动作额度；已达上限时饱和（不超限）
    pub fn consume(&mut self) {
        if self.taken < self.ceiling {
            self.taken += 1;
        }
    }

    pub fn taken(&self) -> u32 {
        self.taken
    }

    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_ceiling_drawn_within_bounds() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let budget = ActionBudget::draw(35, 50, &mut rng);
            assert!((35..=50).contains(&budget.ceiling()));
        }
    }

    #[test]
    fn test_swapped_bounds_are_normalized() {
        let mut rng = StdRng::seed_from_u64(1);
        let budget = ActionBudget::draw(50, 35, &mut rng);
        assert!((35..=50).contains(&budget.ceiling()));
    }

    #[test]
    fn test_consume_never_exceeds_ceiling() {
        let mut budget = ActionBudget::fixed(3);
        for _ in 0..10 {
            budget.consume();
        }
        assert_eq!(budget.taken(), 3);
        assert!(budget.exhausted());
    }

    #[test]
    fn test_not_exhausted_until_ceiling() {
        let mut budget = ActionBudget::fixed(2);
        assert!(!budget.exhausted());
        budget.consume();
        assert!(!budget.exhausted());
        budget.consume();
        assert!(budget.exhausted());
    }
}
