// programs/seasonal_farm/src/schedule.rs
//
// Season Clock & Allocation Schedule
// ==================================
//
// Reward weighting rotates through the four seasons on a fixed calendar:
// - Reallocation n is due at start_time + n * reallocation_interval
// - The first three steps of every cycle double Spring, Summer, then Autumn
// - The fourth step (Winter's turn) returns every weight to its initial value
//
// Withdrawal windows are derived from a position's deposit time alone and are
// never stored.

use anchor_lang::prelude::*;

/// Number of seasonal tokens (and therefore held-token pools)
pub const SEASON_COUNT: usize = 4;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Weights every farm starts with, indexed by season
pub const INITIAL_ALLOCATION_WEIGHTS: [u64; SEASON_COUNT] = [5, 6, 7, 8];

// =============================================================================
// SEASONS
// =============================================================================

/// One of the four seasonal tokens, cyclically ordered
#[derive(
    AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, Default, InitSpace,
)]
#[repr(u8)]
pub enum Season {
    #[default]
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; SEASON_COUNT] = [
        Season::Spring,
        Season::Summer,
        Season::Autumn,
        Season::Winter,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Season> {
        Self::ALL.get(index).copied()
    }

    /// Next season in the cycle (Winter wraps to Spring)
    pub fn next(self) -> Season {
        Self::ALL[(self.index() + 1) % SEASON_COUNT]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

// =============================================================================
// SEASON CLOCK
// =============================================================================

/// Number of reallocations due at `now`.
///
/// Zero before `start_time + interval`, then one more per elapsed interval.
pub fn reallocations_due(start_time: i64, interval: i64, now: i64) -> u64 {
    if interval <= 0 || now < start_time {
        return 0;
    }
    (now.saturating_sub(start_time) / interval) as u64
}

/// Season currently enjoying a boosted weight, if any.
///
/// After `n` reallocations the most recently doubled season is `n mod 4 - 1`;
/// a cycle boundary leaves no season favored.
pub fn favored_season(reallocation_count: u64) -> Option<Season> {
    match (reallocation_count % SEASON_COUNT as u64) as usize {
        0 => None,
        phase => Season::from_index(phase - 1),
    }
}

// =============================================================================
// ALLOCATION STATE
// =============================================================================

/// Season weights plus the number of reallocation steps already applied
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug, InitSpace)]
pub struct AllocationState {
    /// Current weight per season
    pub weights: [u64; SEASON_COUNT],

    /// Steps applied since the farm started
    pub reallocation_count: u64,
}

impl Default for AllocationState {
    fn default() -> Self {
        Self {
            weights: INITIAL_ALLOCATION_WEIGHTS,
            reallocation_count: 0,
        }
    }
}

impl AllocationState {
    const CYCLE_LENGTH: u64 = SEASON_COUNT as u64;

    pub fn weight(&self, season: Season) -> u64 {
        self.weights[season.index()]
    }

    /// Apply exactly one reallocation step.
    pub fn apply_step(&mut self) {
        let phase = (self.reallocation_count % Self::CYCLE_LENGTH) as usize;
        if phase == Season::Winter.index() {
            self.weights = INITIAL_ALLOCATION_WEIGHTS;
        } else {
            self.weights[phase] =
                self.weights[phase].saturating_add(INITIAL_ALLOCATION_WEIGHTS[phase]);
        }
        self.reallocation_count = self.reallocation_count.saturating_add(1);
    }

    /// Bring the weights up to `due` reallocations, returning the number of
    /// steps that were missed. Idempotent; never moves backwards.
    pub fn catch_up_to(&mut self, due: u64) -> u64 {
        if due <= self.reallocation_count {
            return 0;
        }
        let pending = due - self.reallocation_count;

        // A full cycle of four steps leaves the weights where it found them.
        let whole_cycles = pending / Self::CYCLE_LENGTH * Self::CYCLE_LENGTH;
        self.reallocation_count += whole_cycles;
        for _ in 0..(pending - whole_cycles) {
            self.apply_step();
        }

        pending
    }

    /// Sum of the weights of seasons whose balance is non-zero.
    ///
    /// A season counts with its full weight as soon as any amount is present.
    pub fn effective_total_allocation_size(&self, balances: &[u128; SEASON_COUNT]) -> u64 {
        self.weights
            .iter()
            .zip(balances.iter())
            .filter(|(_, balance)| **balance > 0)
            .fold(0u64, |total, (weight, _)| total.saturating_add(*weight))
    }

    pub fn favored_season(&self) -> Option<Season> {
        favored_season(self.reallocation_count)
    }
}

// =============================================================================
// WITHDRAWAL WINDOW
// =============================================================================

/// Alternating closed/open intervals measured from a position's deposit time.
///
/// `[0, unavailable)` is closed, `[unavailable, unavailable + available)` is
/// open, and the pattern repeats forever.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WithdrawalWindow {
    /// Closed stretch in seconds
    pub unavailable: i64,
    /// Open stretch in seconds
    pub available: i64,
}

impl WithdrawalWindow {
    pub fn from_days(unavailable_days: i64, available_days: i64) -> Self {
        Self {
            unavailable: unavailable_days.saturating_mul(SECONDS_PER_DAY),
            available: available_days.saturating_mul(SECONDS_PER_DAY),
        }
    }

    fn period(&self) -> i64 {
        self.unavailable.saturating_add(self.available)
    }

    pub fn is_open(&self, deposited_at: i64, now: i64) -> bool {
        let period = self.period();
        if now < deposited_at || period <= 0 {
            return false;
        }
        now.saturating_sub(deposited_at) % period >= self.unavailable
    }

    /// Start of the first open window strictly after `now`.
    pub fn next_open(&self, deposited_at: i64, now: i64) -> i64 {
        let first = deposited_at.saturating_add(self.unavailable);
        let period = self.period();
        if now < first || period <= 0 {
            return first.max(now);
        }
        let cycles = now.saturating_sub(first) / period + 1;
        first.saturating_add(cycles.saturating_mul(period))
    }
}

// =============================================================================
// UNIT TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const INTERVAL: i64 = 365 * SECONDS_PER_DAY * 3 / 4;

    #[test]
    fn test_season_cycle() {
        assert_eq!(Season::Spring.next(), Season::Summer);
        assert_eq!(Season::Winter.next(), Season::Spring);
        assert_eq!(Season::from_index(2), Some(Season::Autumn));
        assert_eq!(Season::from_index(4), None);
        assert_eq!(Season::Winter.name(), "Winter");
        assert_eq!(Season::default(), Season::Spring);
    }

    #[test]
    fn test_reallocation_cycle_matches_reference_vectors() {
        let mut state = AllocationState::default();
        assert_eq!(state.weights, [5, 6, 7, 8]);

        state.apply_step();
        assert_eq!(state.weights, [10, 6, 7, 8]);
        state.apply_step();
        assert_eq!(state.weights, [10, 12, 7, 8]);
        state.apply_step();
        assert_eq!(state.weights, [10, 12, 14, 8]);
        state.apply_step();
        assert_eq!(state.weights, [5, 6, 7, 8]);
        assert_eq!(state.reallocation_count, 4);
    }

    #[test]
    fn test_no_reallocation_before_first_interval() {
        let start = 1_641_340_800;
        assert_eq!(reallocations_due(start, INTERVAL, start - 1), 0);
        assert_eq!(reallocations_due(start, INTERVAL, start), 0);
        assert_eq!(reallocations_due(start, INTERVAL, start + INTERVAL - 1), 0);
        assert_eq!(reallocations_due(start, INTERVAL, start + INTERVAL), 1);
        assert_eq!(reallocations_due(start, INTERVAL, start + 5 * INTERVAL + 7), 5);
    }

    #[test]
    fn test_reallocations_follow_the_calendar() {
        // Farm starts 120 days after "now", as in a pre-announced launch
        let now = 1_700_000_000;
        let start = now + 120 * SECONDS_PER_DAY;
        let mut state = AllocationState::default();

        state.catch_up_to(reallocations_due(start, INTERVAL, now));
        assert_eq!(state.reallocation_count, 0);

        let mut t = now + INTERVAL + 120 * SECONDS_PER_DAY;
        let expected = [[10, 6, 7, 8], [10, 12, 7, 8], [10, 12, 14, 8], [5, 6, 7, 8]];
        for (step, weights) in expected.iter().enumerate() {
            state.catch_up_to(reallocations_due(start, INTERVAL, t));
            assert_eq!(state.reallocation_count, step as u64 + 1);
            assert_eq!(&state.weights, weights);
            t += INTERVAL;
        }
    }

    #[test]
    fn test_catch_up_is_idempotent() {
        let mut state = AllocationState::default();
        assert_eq!(state.catch_up_to(3), 3);
        let snapshot = state;
        assert_eq!(state.catch_up_to(3), 0);
        assert_eq!(state.catch_up_to(1), 0);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_favored_season() {
        assert_eq!(favored_season(0), None);
        assert_eq!(favored_season(1), Some(Season::Spring));
        assert_eq!(favored_season(2), Some(Season::Summer));
        assert_eq!(favored_season(3), Some(Season::Autumn));
        assert_eq!(favored_season(4), None);
        assert_eq!(favored_season(9), Some(Season::Spring));
    }

    #[test]
    fn test_effective_total_allocation_size() {
        let state = AllocationState::default();
        assert_eq!(state.effective_total_allocation_size(&[0, 0, 0, 0]), 0);
        assert_eq!(state.effective_total_allocation_size(&[1, 0, 0, 0]), 5);
        assert_eq!(state.effective_total_allocation_size(&[0, 1, 0, 0]), 6);
        assert_eq!(state.effective_total_allocation_size(&[0, 0, 1, 0]), 7);
        assert_eq!(state.effective_total_allocation_size(&[0, 0, 0, 1]), 8);
        assert_eq!(state.effective_total_allocation_size(&[1, 1, 1, 1]), 5 + 6 + 7 + 8);
        // Amount does not matter, presence does
        assert_eq!(
            state.effective_total_allocation_size(&[u128::MAX, 0, 0, 3]),
            5 + 8
        );
    }

    #[test]
    fn test_effective_total_tracks_reallocated_weights() {
        let mut state = AllocationState::default();
        state.catch_up_to(2);
        assert_eq!(state.effective_total_allocation_size(&[1, 1, 0, 0]), 10 + 12);
    }

    #[test]
    fn test_withdrawal_window_open_and_closed() {
        let window = WithdrawalWindow::from_days(30, 10);
        let deposited = 1_000_000;
        let day = SECONDS_PER_DAY;

        assert!(!window.is_open(deposited, deposited));
        assert!(!window.is_open(deposited, deposited + 30 * day - 1));
        assert!(window.is_open(deposited, deposited + 30 * day));
        assert!(window.is_open(deposited, deposited + 40 * day - 1));
        assert!(!window.is_open(deposited, deposited + 40 * day));
        assert!(window.is_open(deposited, deposited + 70 * day));
        assert!(!window.is_open(deposited, deposited - 1));
    }

    #[test]
    fn test_next_withdrawal_time() {
        let window = WithdrawalWindow::from_days(30, 10);
        let deposited = 1_000_000;
        let day = SECONDS_PER_DAY;

        assert_eq!(window.next_open(deposited, deposited), deposited + 30 * day);
        // Inside an open window the next one is a full period later
        assert_eq!(
            window.next_open(deposited, deposited + 30 * day),
            deposited + 70 * day
        );
        assert_eq!(
            window.next_open(deposited, deposited + 69 * day),
            deposited + 70 * day
        );
    }

    fn naive_replay(steps: u64) -> AllocationState {
        let mut state = AllocationState::default();
        for _ in 0..steps {
            state.apply_step();
        }
        state
    }

    proptest! {
        #[test]
        fn catch_up_matches_sequential_replay(
            start in 0i64..2_000_000_000,
            offsets in proptest::collection::vec(0i64..40 * INTERVAL, 1..12),
        ) {
            let mut observed: Vec<i64> = offsets.iter().map(|o| start + o).collect();
            observed.sort_unstable();

            // Catch up at every observation vs. once at the end
            let mut incremental = AllocationState::default();
            for now in &observed {
                incremental.catch_up_to(reallocations_due(start, INTERVAL, *now));
            }
            let last = *observed.last().unwrap();
            let due = reallocations_due(start, INTERVAL, last);

            let mut single = AllocationState::default();
            single.catch_up_to(due);

            prop_assert_eq!(incremental, single);
            prop_assert_eq!(single, naive_replay(due));
        }

        #[test]
        fn four_steps_are_identity(prefix in 0u64..64) {
            let mut state = naive_replay(prefix);
            let before = state.weights;
            for _ in 0..4 {
                state.apply_step();
            }
            prop_assert_eq!(state.weights, before);
        }

        #[test]
        fn next_withdrawal_is_after_now_and_opens_a_window(
            deposited in 0i64..1_000_000_000,
            elapsed in 0i64..2_000 * SECONDS_PER_DAY,
        ) {
            let window = WithdrawalWindow::from_days(30, 10);
            let now = deposited + elapsed;
            let next = window.next_open(deposited, now);
            prop_assert!(next > now);
            prop_assert!(window.is_open(deposited, next));
            prop_assert!(!window.is_open(deposited, next - 1));
        }
    }
}
