// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of the fixed reply keyboards.

use moneylimit_core::types::Keyboard;
use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove, ReplyMarkup};

/// Telegram markup for a keyboard layout.
pub fn reply_markup(keyboard: Keyboard) -> ReplyMarkup {
    match keyboard {
        Keyboard::Remove => ReplyMarkup::KeyboardRemove(KeyboardRemove::new()),
        layout => {
            let rows = layout
                .rows()
                .into_iter()
                .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>());
            ReplyMarkup::Keyboard(KeyboardMarkup::new(rows).resize_keyboard())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneylimit_core::types::labels;

    fn buttons(markup: ReplyMarkup) -> Vec<Vec<String>> {
        match markup {
            ReplyMarkup::Keyboard(kb) => kb
                .keyboard
                .into_iter()
                .map(|row| row.into_iter().map(|b| b.text).collect())
                .collect(),
            other => panic!("expected a reply keyboard, got {other:?}"),
        }
    }

    #[test]
    fn main_keyboard_has_one_button_per_row() {
        assert_eq!(
            buttons(reply_markup(Keyboard::Main)),
            vec![
                vec![labels::TODAY.to_string()],
                vec![labels::SPENT.to_string()],
                vec![labels::CHANGE_AMOUNT.to_string()],
                vec![labels::PAY.to_string()],
            ]
        );
    }

    #[test]
    fn start_and_pay_keyboards() {
        assert_eq!(
            buttons(reply_markup(Keyboard::Start)),
            vec![vec![labels::BEGIN.to_string()]]
        );
        assert_eq!(
            buttons(reply_markup(Keyboard::Pay)),
            vec![vec![labels::PAY.to_string()]]
        );
    }

    #[test]
    fn remove_hides_keyboard() {
        assert!(matches!(
            reply_markup(Keyboard::Remove),
            ReplyMarkup::KeyboardRemove(_)
        ));
    }
}
