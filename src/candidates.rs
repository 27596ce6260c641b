// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Built-in candidate list.

/// Common passwords tried against the target account, in order.
pub const COMMON_PASSWORDS: &[&str] = &[
    "password",
    "password123",
    "admin",
    "admin123",
    "123456",
    "qwerty",
    "letmein",
    "welcome",
    "monkey",
    "dragon",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_has_no_duplicates() {
        let unique: std::collections::HashSet<_> = COMMON_PASSWORDS.iter().collect();
        assert_eq!(unique.len(), COMMON_PASSWORDS.len());
    }

    #[test]
    fn test_list_order() {
        assert_eq!(COMMON_PASSWORDS.first(), Some(&"password"));
        assert_eq!(COMMON_PASSWORDS.last(), Some(&"dragon"));
    }
}
