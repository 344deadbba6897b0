use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use regex::Regex;

use keyline::error::ShareError;
use keyline::share::{decode, encode, share_url, token_from_url};

#[test]
fn token_has_base64_payload_and_hex_checksum() {
    let shape = Regex::new(r"^[A-Za-z0-9+/]+=*\.[0-9a-f]+$").unwrap();
    for (score, wpm, accuracy) in [(0, 0, 0.0), (100, 250, 100.0), (57, 48, 93.27)] {
        let token = encode(score, wpm, accuracy, 1_700_000_000_000);
        assert!(shape.is_match(&token), "unexpected token {token}");
    }
}

#[test]
fn link_round_trips_through_url_fragment() {
    let token = encode(73, 61, 88.5, 1_700_000_000_123);
    let url = share_url("https://example.org/typing", &token);
    let shared = decode(token_from_url(&url).unwrap()).unwrap();
    assert_eq!(shared.score, 73);
    assert_eq!(shared.wpm, 61);
    assert_eq!(shared.accuracy, 88.5);
    assert_eq!(shared.timestamp, Some(1_700_000_000_123));
}

#[test]
fn accuracy_is_rounded_to_two_places() {
    let shared = decode(&encode(1, 1, 66.666, 0)).unwrap();
    assert_eq!(shared.accuracy, 66.67);
}

#[test]
fn any_checksum_change_is_detected() {
    let token = encode(90, 70, 99.0, 42);
    let (payload, sum) = token.rsplit_once('.').unwrap();
    for i in 0..sum.len() {
        let mut chars: Vec<char> = sum.chars().collect();
        chars[i] = if chars[i] == 'f' { '0' } else { 'f' };
        let corrupted = format!("{payload}.{}", chars.iter().collect::<String>());
        assert!(matches!(
            decode(&corrupted),
            Err(ShareError::ChecksumMismatch { .. })
        ));
    }
}

#[test]
fn garbage_is_an_error_not_a_panic() {
    for bad in ["", ".", "abc", "%%%.12", "aGVsbG8=.zz", "aGVsbG8=.214"] {
        assert!(decode(bad).is_err(), "{bad:?} decoded");
    }
    // Well-formed tokens whose accuracy is not a finite number.
    for payload in ["80|50|NaN|1", "80|50|inf|1", "80|50|infinity|1"] {
        let sum: u64 = payload.chars().map(|c| c as u64).sum();
        let token = format!("{}.{sum:x}", STANDARD.encode(payload));
        assert!(
            matches!(decode(&token), Err(ShareError::InvalidField { .. })),
            "{payload:?} decoded"
        );
    }
}
