//! 候选筛选：从一页帖子中选出至多一条
//!
//! 有界随机抽样避免偏向分页顺序；按抽样顺序扫描，第一条「台账无记录
//! 且热度双阈值达标」的帖子胜出。已有记录的帖子记 skip 但不终止扫描。

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::social::MediaItem;
use crate::store::ActionLedger;

/// 筛选条件：热度阈值（严格大于）与抽样规模
#[derive(Clone, Debug)]
pub struct SelectionCriteria {
    pub like_threshold: u64,
    pub comment_threshold: u64,
    pub sample_size: usize,
}

/// 从一页帖子中选出候选；无合格者返回 None（本轮跳过，不消耗预算）
pub fn select_candidate(
    page: &[MediaItem],
    criteria: &SelectionCriteria,
    ledger: &dyn ActionLedger,
    rng: &mut StdRng,
) -> Option<MediaItem> {
    if page.is_empty() {
        return None;
    }
    let amount = criteria.sample_size.min(page.len());

    for item in page.choose_multiple(rng, amount) {
        match ledger.has_action(&item.id) {
            Ok(true) => {
                tracing::info!("Skipping post {}: a past action exists", item.id);
                continue;
            }
            Err(e) => {
                // 台账读不到时宁可跳过，避免重复动作
                tracing::warn!("Ledger lookup failed for {}: {e}, skipping", item.id);
                continue;
            }
            Ok(false) => {}
        }

        if item.like_count > criteria.like_threshold
            && item.comment_count > criteria.comment_threshold
        {
            tracing::info!(
                "Selected post {} (likes {}, comments {})",
                item.id,
                item.like_count,
                item.comment_count
            );
            return Some(item.clone());
        }
        tracing::debug!(
            "Post {} below thresholds (likes {}, comments {})",
            item.id,
            item.like_count,
            item.comment_count
        );
    }
    None
}
