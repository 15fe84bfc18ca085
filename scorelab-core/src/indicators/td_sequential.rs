//! TD Sequential setup count.
//!
//! From bar 4 on, a close above the close four bars earlier extends the up
//! count and resets the down count; a lower close does the mirror; an equal
//! close resets both. The output is the signed running count (up positive,
//! down negative). A count that reaches 9 emits +9 / -9 on that bar and
//! starts over.

const COMPARE_LAG: usize = 4;
const SETUP_LENGTH: i32 = 9;

pub fn td_sequential(closes: &[f64]) -> Vec<i32> {
    let mut result = vec![0; closes.len()];
    let mut up = 0;
    let mut down = 0;

    for i in COMPARE_LAG..closes.len() {
        let prior = closes[i - COMPARE_LAG];
        if closes[i] > prior {
            up += 1;
            down = 0;
        } else if closes[i] < prior {
            down += 1;
            up = 0;
        } else {
            up = 0;
            down = 0;
        }

        if up == SETUP_LENGTH {
            result[i] = SETUP_LENGTH;
            up = 0;
        } else if down == SETUP_LENGTH {
            result[i] = -SETUP_LENGTH;
            down = 0;
        } else if up > 0 {
            result[i] = up;
        } else if down > 0 {
            result[i] = -down;
        }
    }

    result
}
