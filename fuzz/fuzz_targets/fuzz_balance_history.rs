#![no_main]

use libfuzzer_sys::fuzz_target;

use accrue_accrual::AccountBalance;
use accrue_types::Timestamp;

#[derive(Debug, arbitrary::Arbitrary)]
enum Step {
    Credit(u64),
    Debit(u64),
    Wait(u32),
    Realize,
}

// Arbitrary credit/debit/wait sequences against one account. Accrual must
// never panic and pending reward must be computable at every step.
fuzz_target!(|input: (u16, Vec<Step>)| {
    let (rate_bps, steps) = input;
    let rate_bps = u32::from(rate_bps);
    let mut balance = AccountBalance::new();
    let mut now = 0u64;

    for step in steps.into_iter().take(256) {
        let at = Timestamp::new(now);
        match step {
            Step::Credit(amount) => {
                if balance.advance(at).is_ok() {
                    let _ = balance.credit(u128::from(amount));
                }
            }
            Step::Debit(amount) => {
                if balance.advance(at).is_ok() {
                    let _ = balance.debit(u128::from(amount));
                }
            }
            Step::Wait(secs) => now = now.saturating_add(u64::from(secs)),
            Step::Realize => {
                let reward = balance.pending_reward(at, rate_bps);
                balance.restart_period(at);
                let _ = balance.credit(reward);
            }
        }
        let _ = balance.pending_reward_checked(Timestamp::new(now), rate_bps);
    }
});
