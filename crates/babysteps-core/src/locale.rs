//! User-facing strings in the three supported languages.
//!
//! Uzbek is the default; Russian and English mirror it. Anything shown to a
//! parent goes through [`Locale`] so the CLI and library agree on wording.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use crate::model::FeedingKind;
use crate::types::ValidationError;

/// Display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Uz,
    Ru,
    En,
}

impl Locale {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Uz => "uz",
            Self::Ru => "ru",
            Self::En => "en",
        }
    }

    /// Abbreviated weekday name used as a chart label.
    #[must_use]
    pub fn weekday_short(self, day: Weekday) -> &'static str {
        const UZ: [&str; 7] = ["Dush", "Sesh", "Chor", "Pay", "Jum", "Shan", "Yak"];
        const RU: [&str; 7] = ["пн", "вт", "ср", "чт", "пт", "сб", "вс"];
        const EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
        let idx = day.num_days_from_monday() as usize;
        match self {
            Self::Uz => UZ[idx],
            Self::Ru => RU[idx],
            Self::En => EN[idx],
        }
    }

    #[must_use]
    pub const fn feeding_label(self, kind: FeedingKind) -> &'static str {
        match (self, kind) {
            (Self::Uz, FeedingKind::BreastLeft) => "Chap ko'krak",
            (Self::Uz, FeedingKind::BreastRight) => "O'ng ko'krak",
            (Self::Uz, FeedingKind::Bottle) => "Butilka",
            (Self::Uz, FeedingKind::Solid) => "Qo'shimcha ovqat",
            (Self::Uz, FeedingKind::Water) => "Suv",
            (Self::Uz, FeedingKind::Porridge) => "Kasha",
            (Self::Uz, FeedingKind::Fruit) => "Meva/Pyure",
            (Self::Uz, FeedingKind::Other) => "Boshqa",
            (Self::Ru, FeedingKind::BreastLeft) => "Левая грудь",
            (Self::Ru, FeedingKind::BreastRight) => "Правая грудь",
            (Self::Ru, FeedingKind::Bottle) => "Бутылочка",
            (Self::Ru, FeedingKind::Solid) => "Прикорм",
            (Self::Ru, FeedingKind::Water) => "Вода",
            (Self::Ru, FeedingKind::Porridge) => "Каша",
            (Self::Ru, FeedingKind::Fruit) => "Фрукты/Пюре",
            (Self::Ru, FeedingKind::Other) => "Другое",
            (Self::En, FeedingKind::BreastLeft) => "Left breast",
            (Self::En, FeedingKind::BreastRight) => "Right breast",
            (Self::En, FeedingKind::Bottle) => "Bottle",
            (Self::En, FeedingKind::Solid) => "Solids",
            (Self::En, FeedingKind::Water) => "Water",
            (Self::En, FeedingKind::Porridge) => "Porridge",
            (Self::En, FeedingKind::Fruit) => "Fruit/Puree",
            (Self::En, FeedingKind::Other) => "Other",
        }
    }

    /// Note prefix for a manually entered feeding.
    #[must_use]
    pub fn feeding_note(self, kind: FeedingKind) -> String {
        let label = self.feeding_label(kind);
        match self {
            Self::Uz => format!("{label} yedi."),
            Self::Ru => format!("{label}: поел(а)."),
            Self::En => format!("Ate {}.", label.to_lowercase()),
        }
    }

    /// Note prefix for a manually entered sleep of `minutes`.
    #[must_use]
    pub fn manual_sleep_note(self, minutes: i64) -> String {
        let hours = minutes / 60;
        let mins = minutes % 60;
        match self {
            Self::Uz => {
                let hours_text = if hours > 0 {
                    format!("{hours} soat ")
                } else {
                    String::new()
                };
                format!("{hours_text}{mins} daqiqa uxladi (qo'lda).")
            }
            Self::Ru => {
                let hours_text = if hours > 0 {
                    format!("{hours} ч ")
                } else {
                    String::new()
                };
                format!("{hours_text}{mins} мин сна (вручную).")
            }
            Self::En => {
                let hours_text = match hours {
                    0 => String::new(),
                    1 => "1 hour ".to_string(),
                    n => format!("{n} hours "),
                };
                let mins_text = if mins == 1 {
                    "1 minute".to_string()
                } else {
                    format!("{mins} minutes")
                };
                format!("{hours_text}{mins_text} slept (manual).")
            }
        }
    }

    /// Note attached to a log produced by the sleep timer.
    #[must_use]
    pub fn timer_note(self, clock: &str) -> String {
        match self {
            Self::Uz => format!("{clock} uxladi"),
            Self::Ru => format!("{clock} сна"),
            Self::En => format!("{clock} slept"),
        }
    }

    #[must_use]
    pub const fn timer_help(self) -> &'static str {
        match self {
            Self::Uz => "Taymer ishga tushdi. p = pauza, r = davom, s = to'xtatish",
            Self::Ru => "Таймер запущен. p = пауза, r = продолжить, s = стоп",
            Self::En => "Timer started. p = pause, r = resume, s = stop",
        }
    }

    #[must_use]
    pub fn timer_paused(self, clock: &str) -> String {
        match self {
            Self::Uz => format!("Pauza: {clock}"),
            Self::Ru => format!("Пауза на {clock}"),
            Self::En => format!("Paused at {clock}"),
        }
    }

    #[must_use]
    pub const fn timer_resumed(self) -> &'static str {
        match self {
            Self::Uz => "Davom etmoqda",
            Self::Ru => "Продолжено",
            Self::En => "Resumed",
        }
    }

    #[must_use]
    pub fn sleep_saved(self, note: &str) -> String {
        match self {
            Self::Uz => format!("Uyqu saqlandi: {note}"),
            Self::Ru => format!("Сон сохранён: {note}"),
            Self::En => format!("Saved sleep: {note}"),
        }
    }

    #[must_use]
    pub fn advisory_data_error(self, hours: f64) -> String {
        match self {
            Self::Uz => format!(
                "Xatolik! {hours:.1} soat uyqu kiritildi. Iltimos, ma'lumotlarni tekshiring."
            ),
            Self::Ru => format!(
                "Ошибка! Внесено {hours:.1} ч сна. Пожалуйста, проверьте данные."
            ),
            Self::En => format!("Error! {hours:.1} hours of sleep were entered. Please check the data."),
        }
    }

    #[must_use]
    pub const fn advisory_nothing_today(self) -> &'static str {
        match self {
            Self::Uz => "Bugun hali hech qanday ma'lumot kiritilmadi.",
            Self::Ru => "Сегодня ещё ничего не записано.",
            Self::En => "Nothing has been logged today yet.",
        }
    }

    #[must_use]
    pub fn advisory_low_sleep(self, name: &str, hours: f64) -> String {
        match self {
            Self::Uz => format!(
                "Bugungi uyqu biroz kam ({hours:.1} soat). {name}ni ko'proq uxlatishga harakat qiling."
            ),
            Self::Ru => format!(
                "Сегодня сна маловато ({hours:.1} ч). Постарайтесь, чтобы {name} спал(а) больше."
            ),
            Self::En => format!(
                "Sleep is a little low today ({hours:.1} h). Try to help {name} sleep more."
            ),
        }
    }

    #[must_use]
    pub fn advisory_good(self, name: &str, hours: f64) -> String {
        match self {
            Self::Uz => format!("Ajoyib! {name} bugun {hours:.1} soat uxladi va rejimi joyida."),
            Self::Ru => format!("Отлично! {name} сегодня спал(а) {hours:.1} ч, режим в порядке."),
            Self::En => format!("Great! {name} slept {hours:.1} hours today and the routine is on track."),
        }
    }

    #[must_use]
    pub const fn advisory_not_enough_data(self) -> &'static str {
        match self {
            Self::Uz => "Hozircha ma'lumotlar yetarli emas.",
            Self::Ru => "Пока недостаточно данных.",
            Self::En => "Not enough data yet.",
        }
    }

    #[must_use]
    pub const fn age_newborn(self) -> &'static str {
        match self {
            Self::Uz => "Yangi tug'ilgan",
            Self::Ru => "Новорождённый",
            Self::En => "Newborn",
        }
    }

    #[must_use]
    pub fn age_months(self, months: u32) -> String {
        match self {
            Self::Uz => format!("{months} oylik"),
            Self::Ru => format!("{months} мес."),
            Self::En => format!("{months} months"),
        }
    }

    #[must_use]
    pub fn age_years(self, years: u32, months: u32) -> String {
        match (self, months) {
            (Self::Uz, 0) => format!("{years} yosh"),
            (Self::Uz, m) => format!("{years} yosh, {m} oy"),
            (Self::Ru, 0) => format!("{years} г."),
            (Self::Ru, m) => format!("{years} г. {m} мес."),
            (Self::En, 0) => format!("{years} years"),
            (Self::En, m) => format!("{years} years, {m} months"),
        }
    }

    #[must_use]
    pub const fn just_now(self) -> &'static str {
        match self {
            Self::Uz => "Hozirgina",
            Self::Ru => "Только что",
            Self::En => "Just now",
        }
    }

    #[must_use]
    pub fn minutes_ago(self, n: i64) -> String {
        match self {
            Self::Uz => format!("{n} daqiqa oldin"),
            Self::Ru => format!("{n} мин назад"),
            Self::En => format!("{n} min ago"),
        }
    }

    #[must_use]
    pub fn hours_ago(self, n: i64) -> String {
        match self {
            Self::Uz => format!("{n} soat oldin"),
            Self::Ru => format!("{n} ч назад"),
            Self::En => format!("{n} h ago"),
        }
    }

    #[must_use]
    pub fn days_ago(self, n: i64) -> String {
        match self {
            Self::Uz => format!("{n} kun oldin"),
            Self::Ru => format!("{n} дн назад"),
            Self::En => format!("{n} days ago"),
        }
    }

    #[must_use]
    pub const fn assistant_greeting(self) -> &'static str {
        match self {
            Self::Uz => {
                "Salom! Men sizning AI yordamchingizman. Mendan bolangizning uyqusi, ovqatlanishi yoki rivojlanishi haqida istalgan narsani so'rashingiz mumkin."
            }
            Self::Ru => {
                "Здравствуйте! Я ваш AI-помощник. Спрашивайте о сне, питании или развитии вашего малыша."
            }
            Self::En => {
                "Hi! I'm your AI assistant. Ask me anything about your baby's sleep, feeding or development."
            }
        }
    }

    #[must_use]
    pub const fn assistant_apology(self) -> &'static str {
        match self {
            Self::Uz => "Uzr, texnik xatolik yuz berdi. Internetni tekshiring.",
            Self::Ru => "Извините, произошла техническая ошибка. Проверьте интернет.",
            Self::En => "Sorry, a technical error occurred. Please check your connection.",
        }
    }

    #[must_use]
    pub const fn assistant_empty_answer(self) -> &'static str {
        match self {
            Self::Uz => "Javob bo'sh keldi.",
            Self::Ru => "Пришёл пустой ответ.",
            Self::En => "The answer came back empty.",
        }
    }

    #[must_use]
    pub const fn assistant_missing_key(self) -> &'static str {
        match self {
            Self::Uz => "Tizim xatoligi: API kalit yo'q.",
            Self::Ru => "Системная ошибка: нет API-ключа.",
            Self::En => "System error: no API key configured.",
        }
    }

    /// Transcript label for the parent's messages.
    #[must_use]
    pub const fn chat_user_label(self) -> &'static str {
        match self {
            Self::Uz => "Siz",
            Self::Ru => "Вы",
            Self::En => "You",
        }
    }

    /// Transcript label for the assistant's messages.
    #[must_use]
    pub const fn chat_assistant_label(self) -> &'static str {
        match self {
            Self::Uz | Self::Ru | Self::En => "AI",
        }
    }

    #[must_use]
    pub const fn auth_email_in_use(self) -> &'static str {
        match self {
            Self::Uz => "Bu email allaqachon band.",
            Self::Ru => "Этот email уже занят.",
            Self::En => "This email is already in use.",
        }
    }

    #[must_use]
    pub const fn auth_bad_credentials(self) -> &'static str {
        match self {
            Self::Uz => "Email yoki parol noto'g'ri.",
            Self::Ru => "Неверный email или пароль.",
            Self::En => "Wrong email or password.",
        }
    }

    #[must_use]
    pub const fn auth_popup_closed(self) -> &'static str {
        match self {
            Self::Uz => "Jarayon yakunlanmay yopildi.",
            Self::Ru => "Окно закрыто до завершения входа.",
            Self::En => "The sign-in window was closed before finishing.",
        }
    }

    #[must_use]
    pub const fn auth_popup_cancelled(self) -> &'static str {
        match self {
            Self::Uz => "Jarayon bekor qilindi.",
            Self::Ru => "Вход отменён.",
            Self::En => "Sign-in was cancelled.",
        }
    }

    #[must_use]
    pub const fn error_prefix(self) -> &'static str {
        match self {
            Self::Uz => "Xatolik: ",
            Self::Ru => "Ошибка: ",
            Self::En => "Error: ",
        }
    }

    #[must_use]
    pub const fn no_active_baby(self) -> &'static str {
        match self {
            Self::Uz => "Xatolik: Bola tanlanmagan!",
            Self::Ru => "Ошибка: ребёнок не выбран!",
            Self::En => "Error: no child selected!",
        }
    }

    #[must_use]
    pub const fn missing_food(self) -> &'static str {
        match self {
            Self::Uz => "Iltimos, nima yeganini tanlang!",
            Self::Ru => "Пожалуйста, выберите, что ребёнок ел!",
            Self::En => "Please choose what the baby ate!",
        }
    }

    #[must_use]
    pub const fn missing_sleep_minutes(self) -> &'static str {
        match self {
            Self::Uz => "Iltimos, qancha uxlaganini (daqiqa) kiriting!",
            Self::Ru => "Пожалуйста, укажите, сколько минут длился сон!",
            Self::En => "Please enter how long the baby slept (minutes)!",
        }
    }

    #[must_use]
    pub const fn keep_one_child(self) -> &'static str {
        match self {
            Self::Uz => "Kamida bitta bola qolishi kerak!",
            Self::Ru => "Должен остаться хотя бы один ребенок!",
            Self::En => "At least one child is required!",
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "uz" => Ok(Self::Uz),
            "ru" => Ok(Self::Ru),
            "en" => Ok(Self::En),
            _ => Err(ValidationError::InvalidValue {
                field: "locale",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_labels_follow_locale() {
        assert_eq!(Locale::Uz.weekday_short(Weekday::Mon), "Dush");
        assert_eq!(Locale::En.weekday_short(Weekday::Sun), "Sun");
        assert_eq!(Locale::Ru.weekday_short(Weekday::Wed), "ср");
    }

    #[test]
    fn manual_sleep_note_omits_zero_hours() {
        assert_eq!(Locale::Uz.manual_sleep_note(45), "45 daqiqa uxladi (qo'lda).");
        assert_eq!(
            Locale::Uz.manual_sleep_note(90),
            "1 soat 30 daqiqa uxladi (qo'lda)."
        );
        assert_eq!(
            Locale::En.manual_sleep_note(121),
            "2 hours 1 minute slept (manual)."
        );
    }

    #[test]
    fn timer_and_chat_lines_follow_locale() {
        assert_eq!(Locale::Uz.timer_paused("00:00:03"), "Pauza: 00:00:03");
        assert_eq!(Locale::En.sleep_saved("00:00:05 slept"), "Saved sleep: 00:00:05 slept");
        assert_eq!(Locale::Ru.chat_user_label(), "Вы");
        assert_eq!(Locale::Uz.chat_assistant_label(), "AI");
        assert!(Locale::Uz.timer_help().starts_with("Taymer"));
    }

    #[test]
    fn locale_parses_case_insensitively() {
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert!("de".parse::<Locale>().is_err());
    }
}
