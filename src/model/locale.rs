use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GanttError;

/// Languages with a month-name table for date labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "es")]
    Es,
    #[serde(rename = "ru")]
    Ru,
    #[serde(rename = "ptBr", alias = "pt-BR", alias = "pt_br")]
    PtBr,
    #[serde(rename = "fr")]
    Fr,
    #[serde(rename = "tr")]
    Tr,
    #[serde(rename = "zh")]
    Zh,
}

impl Language {
    pub const ALL: [Language; 7] = [
        Language::En,
        Language::Es,
        Language::Ru,
        Language::PtBr,
        Language::Fr,
        Language::Tr,
        Language::Zh,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Ru => "ru",
            Language::PtBr => "ptBr",
            Language::Fr => "fr",
            Language::Tr => "tr",
            Language::Zh => "zh",
        }
    }

    /// Full month names, January first.
    pub fn month_names(self) -> &'static [&'static str; 12] {
        match self {
            Language::En => &[
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December",
            ],
            Language::Es => &[
                "Enero", "Febrero", "Marzo", "Abril", "Mayo", "Junio", "Julio", "Agosto",
                "Septiembre", "Octubre", "Noviembre", "Diciembre",
            ],
            Language::Ru => &[
                "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август",
                "Сентябрь", "Октябрь", "Ноябрь", "Декабрь",
            ],
            Language::PtBr => &[
                "Janeiro", "Fevereiro", "Março", "Abril", "Maio", "Junho", "Julho", "Agosto",
                "Setembro", "Outubro", "Novembro", "Dezembro",
            ],
            Language::Fr => &[
                "Janvier", "Février", "Mars", "Avril", "Mai", "Juin", "Juillet", "Août",
                "Septembre", "Octobre", "Novembre", "Décembre",
            ],
            Language::Tr => &[
                "Ocak", "Şubat", "Mart", "Nisan", "Mayıs", "Haziran", "Temmuz", "Ağustos",
                "Eylül", "Ekim", "Kasım", "Aralık",
            ],
            Language::Zh => &[
                "一月", "二月", "三月", "四月", "五月", "六月", "七月", "八月", "九月",
                "十月", "十一月", "十二月",
            ],
        }
    }

    /// Month name for a one-based month number. Out-of-range months clamp.
    pub fn month_name(self, month: u32) -> &'static str {
        let idx = month.clamp(1, 12) as usize - 1;
        self.month_names()[idx]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = GanttError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "en" => Ok(Language::En),
            "es" => Ok(Language::Es),
            "ru" => Ok(Language::Ru),
            "ptBr" | "pt-BR" | "pt_br" => Ok(Language::PtBr),
            "fr" => Ok(Language::Fr),
            "tr" => Ok(Language::Tr),
            "zh" => Ok(Language::Zh),
            other => Err(GanttError::UnknownLanguage(other.to_string())),
        }
    }
}
