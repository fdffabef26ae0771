//! Statiskt innehåll för silsila och böneguide

use serde::{Deserialize, Serialize};

use crate::utils::AppResult;

/// En rad i silsilan på tre språk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShajraLine {
    pub arabic: String,
    pub roman: String,
    pub urdu: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShajraItem {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub arabic: Option<String>,
    #[serde(default)]
    pub roman: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default)]
    pub lines: Vec<ShajraLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Niyyah {
    pub arabic: String,
    pub english: String,
    #[serde(default)]
    pub bismillah: Option<String>,
    #[serde(default)]
    pub bismillah_trans: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplication {
    pub arabic: String,
    pub roman: String,
    pub english: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WazuStep {
    pub name: String,
    pub detail: String,
    pub arabic: String,
    pub roman: String,
    #[serde(default)]
    pub img: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surah {
    pub name: String,
    pub meaning: String,
    pub arabic: String,
    pub roman: String,
}

/// Ett moment i bönens utförande
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerStep {
    pub step: String,
    pub detail: String,
    pub recitation: String,
    #[serde(default)]
    pub roman: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyPrayer {
    pub name: String,
    pub time: String,
    pub rakats: String,
    pub niyyah: Niyyah,
    #[serde(default)]
    pub tariqa: Vec<PrayerStep>,
    #[serde(default)]
    pub sajda_dua: Vec<PrayerStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuideContent {
    pub wazu_niyyah: Niyyah,
    pub wazu_dua_finish: Supplication,
    pub wazu_steps: Vec<WazuStep>,
    pub surahs: Vec<Surah>,
    pub daily_prayers: Vec<DailyPrayer>,
}

impl GuideContent {
    pub fn load() -> AppResult<Self> {
        let content = serde_json::from_str(include_str!("../../resources/data/guide.json"))?;
        Ok(content)
    }
}

pub fn load_shajra() -> AppResult<Vec<ShajraItem>> {
    let items = serde_json::from_str(include_str!("../../resources/data/shajra.json"))?;
    Ok(items)
}
