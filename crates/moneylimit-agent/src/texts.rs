// SPDX-FileCopyrightText: 2026 MoneyLimit Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! User-facing reply texts.

use chrono::NaiveDate;
use moneylimit_budget::BudgetError;
use moneylimit_core::types::StatKey;
use moneylimit_core::{UserBudget, UserId};

use crate::admin::StatsReport;

fn date(d: NaiveDate) -> String {
    d.format("%d.%m.%Y").to_string()
}

pub fn intro() -> String {
    "Этот бот показывает,\n\
     сколько денег тебе можно потратить сегодня,\n\
     чтобы не остаться без денег в конце месяца."
        .to_string()
}

pub fn ask_monthly_amount() -> String {
    "Сколько денег у тебя есть на месяц?".to_string()
}

pub fn invalid_amount(err: &BudgetError) -> String {
    match err {
        BudgetError::TooLarge { max, .. } => {
            format!("Слишком большая сумма. Введи число не больше {max}.")
        }
        _ => "Введи сумму целым положительным числом, например 30000.".to_string(),
    }
}

pub fn ask_days(default_days: i64) -> String {
    format!(
        "На сколько дней ты хочешь распределить эту сумму?\n\
         (по умолчанию: {default_days})"
    )
}

pub fn setup_done(daily_limit: i64) -> String {
    format!(
        "Твой дневной лимит: {daily_limit} ₽\n\n\
         Сегодня ты можешь потратить\n\
         до {daily_limit} ₽\n\
         и остаться в рамках месяца."
    )
}

pub fn today(budget: &UserBudget) -> String {
    let remaining = budget.remaining_today();
    let status = if remaining >= 0 {
        format!("Осталось на сегодня: {remaining} ₽")
    } else {
        format!("Ты вышел за лимит на {} ₽", remaining.unsigned_abs())
    };
    format!(
        "Сегодня:\n\
         Дневной лимит — {} ₽\n\
         {status}\n\
         Дней до конца периода: {}",
        budget.daily_limit, budget.days_left
    )
}

pub fn ask_spend() -> String {
    "Сколько ты потратил сегодня?".to_string()
}

pub fn invalid_spend(err: &BudgetError) -> String {
    match err {
        BudgetError::TooLarge { max, .. } => {
            format!("Слишком большая трата. Введи число не больше {max}.")
        }
        _ => "Введи сумму траты целым положительным числом.".to_string(),
    }
}

pub fn spend_recorded(remaining: i64) -> String {
    if remaining >= 0 {
        format!("Осталось на сегодня: {remaining} ₽")
    } else {
        format!(
            "Ты вышел за лимит на {} ₽\n\
             Завтра лимит будет меньше.",
            remaining.unsigned_abs()
        )
    }
}

pub fn need_setup() -> String {
    "Сначала настрой бюджет: нажми «Начать».".to_string()
}

pub fn use_buttons() -> String {
    "Выбери действие на клавиатуре ниже.".to_string()
}

pub fn access_denied(expired_on: Option<NaiveDate>) -> String {
    match expired_on {
        Some(day) => format!(
            "Доступ закончился {}.\n\
             Чтобы продолжить считать дневной лимит, оплати доступ.",
            date(day)
        ),
        None => "Доступ не оплачен.\n\
                 Чтобы пользоваться дневным лимитом, оплати доступ."
            .to_string(),
    }
}

pub fn invoice_failed() -> String {
    "Не получилось выставить счёт. Попробуй ещё раз чуть позже.".to_string()
}

pub fn payment_confirmed(until: NaiveDate) -> String {
    format!("Оплата получена, спасибо!\nДоступ продлён до {}.", date(until))
}

pub fn stats(report: &StatsReport) -> String {
    let mut text = String::from("📊 Статистика:\n");
    for (key, value) in &report.counters {
        let label = match key {
            StatKey::Starts => "▶️ Запусков",
            StatKey::SpentActions => "💸 Трат",
            StatKey::PayClicks => "💳 Нажатий «Оплатить»",
            StatKey::Payments => "✅ Оплат",
        };
        text.push_str(&format!("{label}: {value}\n"));
    }
    text.push_str(&format!("👤 DAU сегодня: {}\n", report.active_today));
    text.push_str(&format!("🔓 С активным доступом: {}", report.entitled));
    text
}

pub fn grant_usage() -> String {
    "Использование: /grant <user_id> <дней>".to_string()
}

pub fn grant_done(user_id: UserId, until: NaiveDate) -> String {
    format!("Пользователю {user_id} выдан доступ до {}.", date(until))
}

pub fn grant_not_found(user_id: UserId) -> String {
    format!("Пользователь {user_id} не найден.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spend_reply_reports_overrun() {
        assert_eq!(spend_recorded(60), "Осталось на сегодня: 60 ₽");
        let over = spend_recorded(-25);
        assert!(over.contains("на 25 ₽"));
        assert!(over.contains("Завтра лимит будет меньше."));
    }

    #[test]
    fn dates_use_day_first_format() {
        let until = NaiveDate::from_ymd_opt(2026, 2, 3).unwrap();
        assert!(payment_confirmed(until).contains("03.02.2026"));
        assert!(access_denied(Some(until)).contains("03.02.2026"));
    }

    #[test]
    fn stats_lists_every_counter() {
        let report = StatsReport {
            day: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            counters: StatKey::ALL.iter().map(|k| (*k, 1)).collect(),
            active_today: 4,
            entitled: 2,
        };
        let text = stats(&report);
        assert!(text.contains("Запусков: 1"));
        assert!(text.contains("Трат: 1"));
        assert!(text.contains("DAU сегодня: 4"));
        assert!(text.contains("С активным доступом: 2"));
    }

    #[test]
    fn invalid_input_hints_mention_limit() {
        let err = BudgetError::TooLarge {
            amount: 5,
            max: 3,
        };
        assert!(invalid_spend(&err).contains('3'));
        assert!(invalid_amount(&BudgetError::NotPositive(0)).contains("30000"));
    }
}
