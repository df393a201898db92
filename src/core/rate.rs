//! 限速控制：连续远端调用之间的延迟区间
//!
//! 纯状态持有者：只有编排器读区间并睡眠，其他组件不触碰时钟。
//! 动作成功后切换到对应动作类型的冷却区间（评论冷却长于点赞冷却）。

use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;

use crate::config::RateSection;
use crate::social::ActionKind;

/// [min, max] 延迟区间（秒）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateWindow {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl RateWindow {
    pub fn from_bounds(bounds: [u64; 2]) -> Self {
        let [min, max] = bounds;
        if min <= max {
            Self { min_secs: min, max_secs: max }
        } else {
            Self { min_secs: max, max_secs: min }
        }
    }

    /// 在区间内均匀抽样一个时长
    pub fn sample(&self, rng: &mut StdRng) -> Duration {
        Duration::from_secs(rng.random_range(self.min_secs..=self.max_secs))
    }
}

/// 限速控制器：持有当前区间与各场景的预设
#[derive(Clone, Debug)]
pub struct RateController {
    baseline: RateWindow,
    follow_up: RateWindow,
    endorse_cooldown: RateWindow,
    annotate_cooldown: RateWindow,
    current: RateWindow,
}

impl RateController {
    pub fn new(cfg: &RateSection) -> Self {
        let baseline = RateWindow::from_bounds(cfg.baseline);
        Self {
            baseline,
            follow_up: RateWindow::from_bounds(cfg.follow_up),
            endorse_cooldown: RateWindow::from_bounds(cfg.endorse_cooldown),
            annotate_cooldown: RateWindow::from_bounds(cfg.annotate_cooldown),
            current: baseline,
        }
    }

    pub fn current_window(&self) -> RateWindow {
        self.current
    }

    /// 常规步进区间
    pub fn set_baseline(&mut self) {
        self.current = self.baseline;
    }

    /// 紧随认证 / 详情拉取之后的短区间
    pub fn set_follow_up(&mut self) {
        self.current = self.follow_up;
    }

    /// 动作成功后的冷却区间，按动作类型区分
    pub fn set_cooldown(&mut self, kind: ActionKind) {
        self.current = match kind {
            ActionKind::Endorse => self.endorse_cooldown,
            ActionKind::Annotate => self.annotate_cooldown,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn controller() -> RateController {
        RateController::new(&RateSection::default())
    }

    #[test]
    fn test_starts_at_baseline() {
        let rate = controller();
        assert_eq!(rate.current_window(), RateWindow { min_secs: 1, max_secs: 3 });
    }

    #[test]
    fn test_cooldown_windows_per_kind() {
        let mut rate = controller();
        rate.set_cooldown(ActionKind::Endorse);
        assert_eq!(rate.current_window(), RateWindow { min_secs: 240, max_secs: 360 });
        rate.set_cooldown(ActionKind::Annotate);
        assert_eq!(rate.current_window(), RateWindow { min_secs: 500, max_secs: 1000 });
        // 评论冷却长于点赞冷却
        assert!(rate.current_window().min_secs > 360);
    }

    #[test]
    fn test_sample_stays_within_window() {
        let window = RateWindow { min_secs: 3, max_secs: 5 };
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..100 {
            let d = window.sample(&mut rng);
            assert!((3..=5).contains(&d.as_secs()));
        }
    }

    #[test]
    fn test_zero_window_samples_zero() {
        let window = RateWindow { min_secs: 0, max_secs: 0 };
        let mut rng = StdRng::seed_from_u64(11);
        assert_eq!(window.sample(&mut rng), Duration::ZERO);
    }

    #[test]
    fn test_inverted_bounds_normalized() {
        let window = RateWindow::from_bounds([9, 4]);
        assert_eq!(window, RateWindow { min_secs: 4, max_secs: 9 });
    }
}
