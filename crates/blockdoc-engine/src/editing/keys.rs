use std::collections::HashSet;
use std::sync::{LazyLock, Mutex};

use uuid::Uuid;

const KEY_SPACE: u128 = 1 << 24;

static SEEN_KEYS: LazyLock<Mutex<HashSet<String>>> = LazyLock::new(Default::default);

/// Fresh block key, unique within this process
///
/// Keys are a random 24-bit value written in base 32, so they stay short
/// enough to embed in offset keys. Once every 24-bit key has been handed out,
/// keys are drawn from the full 128-bit space instead.
pub fn generate_random_key() -> String {
    let mut seen = SEEN_KEYS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let space = key_space(seen.len());
    loop {
        let key = to_base32(Uuid::new_v4().as_u128() % space);
        if seen.insert(key.clone()) {
            return key;
        }
    }
}

/// Range keys are drawn from after `issued` keys
fn key_space(issued: usize) -> u128 {
    if (issued as u128) < KEY_SPACE {
        KEY_SPACE
    } else {
        u128::MAX
    }
}

fn to_base32(mut value: u128) -> String {
    const DIGITS: &[u8; 32] = b"0123456789abcdefghijklmnopqrstuv";
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 32) as usize] as char);
        value /= 32;
    }
    digits.iter().rev().collect()
}
