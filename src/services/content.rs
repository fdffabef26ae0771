//! Extern innehållstjänst: korta biografier och talsyntes

use async_trait::async_trait;

use crate::utils::AppResult;

/// Text som visas när tjänsten svarar utan innehåll
pub const EMPTY_BIO: &str = "Uppgifterna finns bevarade.";

#[async_trait]
pub trait ContentService: Send + Sync {
    /// Kort historisk biografi för en person med given roll
    async fn fetch_bio(&self, name: &str, role: &str) -> AppResult<String>;

    /// Rå PCM16 LE (mono, 24 kHz) för texten, `None` om svaret saknar ljud
    async fn synthesize_speech(&self, text: &str) -> AppResult<Option<Vec<u8>>>;
}

/// Prompt för biografin
pub fn bio_prompt(name: &str, role: &str) -> String {
    format!("Generate a short 2-sentence historical bio for {} ({}).", name, role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bio_prompt() {
        assert_eq!(
            bio_prompt("Abdul Karim", "Son"),
            "Generate a short 2-sentence historical bio for Abdul Karim (Son)."
        );
    }
}
