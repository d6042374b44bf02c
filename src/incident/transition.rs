//! # 状态迁移规划
//!
//! 只根据前后两个状态决定是否开启或关闭故障事件

use super::types::TargetStatus;

/// 一次探测后的事件动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// 健康 -> 不健康：开启故障事件并发送宕机通知
    OpenIncident,
    /// 不健康 -> `up`：关闭故障事件并发送恢复通知
    ResolveIncident,
    /// 其他情况只更新状态
    Unchanged,
}

/// 规划状态迁移
#[must_use]
pub const fn plan_transition(previous: TargetStatus, next: TargetStatus) -> Transition {
    if previous.is_healthy() && next.is_unhealthy() {
        Transition::OpenIncident
    } else if previous.is_unhealthy() && matches!(next, TargetStatus::Up) {
        Transition::ResolveIncident
    } else {
        Transition::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incident::types::TargetStatus::{Degraded, Down, Unknown, Up};
    use rstest::rstest;

    #[rstest]
    #[case(Unknown, Up, Transition::Unchanged)]
    #[case(Unknown, Down, Transition::OpenIncident)]
    #[case(Up, Degraded, Transition::OpenIncident)]
    #[case(Up, Down, Transition::OpenIncident)]
    #[case(Down, Down, Transition::Unchanged)]
    #[case(Degraded, Degraded, Transition::Unchanged)]
    #[case(Degraded, Down, Transition::Unchanged)]
    #[case(Down, Degraded, Transition::Unchanged)]
    #[case(Degraded, Up, Transition::ResolveIncident)]
    #[case(Down, Up, Transition::ResolveIncident)]
    #[case(Up, Up, Transition::Unchanged)]
    fn transition_table(
        #[case] previous: TargetStatus,
        #[case] next: TargetStatus,
        #[case] expected: Transition,
    ) {
        assert_eq!(plan_transition(previous, next), expected);
    }

    #[test]
    fn flapping_sequence_opens_and_resolves_once() {
        let mut current = Unknown;
        let mut opened = 0;
        let mut resolved = 0;

        for next in [Up, Down, Down, Up] {
            match plan_transition(current, next) {
                Transition::OpenIncident => opened += 1,
                Transition::ResolveIncident => resolved += 1,
                Transition::Unchanged => {}
            }
            current = next;
        }

        assert_eq!((opened, resolved), (1, 1));
    }
}
