use inventpro_api::rut::{compute_check_digit, is_valid, normalize, Rut};
use proptest::prelude::*;

proptest! {
    // Any 7-8 digit body with its computed check digit is a valid RUT.
    #[test]
    fn computed_check_digit_validates(body in 1_000_000u32..=99_999_999u32) {
        let rut = format!("{}-{}", body, compute_check_digit(body));
        prop_assert!(is_valid(&rut));
    }

    // Normalization is idempotent across dot/hyphen/lowercase spellings.
    #[test]
    fn normalize_is_idempotent(body in 1_000_000u32..=99_999_999u32, dotted in any::<bool>(), hyphen in any::<bool>(), lower in any::<bool>()) {
        let dv = compute_check_digit(body);
        let digits = body.to_string();

        let mut spelled = if dotted {
            let mut grouped = String::new();
            for (i, c) in digits.chars().rev().enumerate() {
                if i > 0 && i % 3 == 0 {
                    grouped.push('.');
                }
                grouped.push(c);
            }
            grouped.chars().rev().collect::<String>()
        } else {
            digits
        };

        if hyphen {
            spelled.push('-');
        }
        spelled.push(dv);

        if lower {
            spelled = spelled.to_lowercase();
        }

        let once = normalize(&spelled).expect("spelling should parse");
        let twice = normalize(&once).expect("canonical form should parse");
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once, format!("{}-{}", body, dv));
    }

    // Replacing the check digit with any other symbol invalidates the RUT.
    #[test]
    fn mutated_check_digit_is_rejected(body in 1_000_000u32..=99_999_999u32) {
        let correct = compute_check_digit(body);
        for candidate in "0123456789K".chars() {
            if candidate == correct {
                continue;
            }
            let mutated = format!("{}-{}", body, candidate);
            prop_assert!(!is_valid(&mutated), "body {} accepted wrong digit {}", body, candidate);
        }
    }

    // Parsing and Display round-trip.
    #[test]
    fn parse_display_round_trip(body in 1_000_000u32..=99_999_999u32) {
        let canonical = format!("{}-{}", body, compute_check_digit(body));
        let parsed = Rut::parse(&canonical).expect("valid");
        prop_assert_eq!(parsed.to_string(), canonical);
    }

    // Bodies outside the 7-8 digit range never validate.
    #[test]
    fn short_bodies_are_rejected(body in 1u32..=999_999u32) {
        let rut = format!("{}-{}", body, compute_check_digit(body));
        prop_assert!(!is_valid(&rut));
    }
}
