//! Uppläsning: talsyntes följd av uppspelning, högst en åt gången i hela appen

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, error, info};

use crate::services::audio::AudioOutput;
use crate::services::content::ContentService;
use crate::utils::{AppError, AppResult};

/// Delad plats för id:t som läses upp just nu
#[derive(Debug, Clone, Default)]
pub struct RecitationSlot {
    current: Arc<Mutex<Option<String>>>,
}

impl RecitationSlot {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.current.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Ta platsen för `id`, eller få tillbaka id:t som redan håller den
    pub fn try_acquire(&self, id: &str) -> Result<RecitationGuard, String> {
        let mut current = self.lock();
        if let Some(busy) = current.as_ref() {
            return Err(busy.clone());
        }

        *current = Some(id.to_string());
        Ok(RecitationGuard {
            slot: self.clone(),
            id: id.to_string(),
        })
    }

    pub fn loading_id(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn is_busy(&self) -> bool {
        self.lock().is_some()
    }
}

/// Håller platsen tills den släpps
#[derive(Debug)]
pub struct RecitationGuard {
    slot: RecitationSlot,
    id: String,
}

impl RecitationGuard {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for RecitationGuard {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReciteOutcome {
    Started,
    /// En annan uppläsning pågår redan
    Rejected { busy_with: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecitationEvent {
    Finished { id: String },
    Failed { id: String, message: String },
}

pub struct Reciter {
    content: Arc<dyn ContentService>,
    audio: Arc<dyn AudioOutput>,
    slot: RecitationSlot,
    runtime: Handle,
    tx: UnboundedSender<RecitationEvent>,
    rx: UnboundedReceiver<RecitationEvent>,
}

impl Reciter {
    pub fn new(content: Arc<dyn ContentService>, audio: Arc<dyn AudioOutput>, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            content,
            audio,
            slot: RecitationSlot::new(),
            runtime,
            tx,
            rx,
        }
    }

    pub fn set_content(&mut self, content: Arc<dyn ContentService>) {
        self.content = content;
    }

    /// Starta uppläsning av `text` under `id`. Ignoreras om en annan pågår.
    pub fn recite(&self, id: &str, text: &str) -> ReciteOutcome {
        let guard = match self.slot.try_acquire(id) {
            Ok(guard) => guard,
            Err(busy_with) => {
                debug!("Uppläsning {} ignorerad, {} pågår", id, busy_with);
                return ReciteOutcome::Rejected { busy_with };
            }
        };

        info!("Startar uppläsning {}", id);
        let content = Arc::clone(&self.content);
        let audio = Arc::clone(&self.audio);
        let tx = self.tx.clone();
        let text = text.to_string();

        self.runtime.spawn(async move {
            // Egen task så att även en panik i uppspelningen rapporteras
            let work = tokio::spawn(async move { speak(content.as_ref(), audio.as_ref(), &text).await });
            let result = match work.await {
                Ok(result) => result,
                Err(e) => Err(AppError::audio(format!("uppläsningen avbröts: {}", e))),
            };
            let id = guard.id().to_string();
            drop(guard);

            let event = match result {
                Ok(()) => RecitationEvent::Finished { id },
                Err(e) => {
                    error!("Uppläsning {} misslyckades: {}", id, e);
                    RecitationEvent::Failed {
                        id,
                        message: e.to_string(),
                    }
                }
            };
            // Mottagaren kan vara borta om appen stängs
            let _ = tx.send(event);
        });

        ReciteOutcome::Started
    }

    pub fn loading_id(&self) -> Option<String> {
        self.slot.loading_id()
    }

    pub fn is_busy(&self) -> bool {
        self.slot.is_busy()
    }

    /// Töm färdiga händelser utan att blockera
    pub fn poll_events(&mut self) -> Vec<RecitationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            events.push(event);
        }
        events
    }

    pub async fn next_event(&mut self) -> Option<RecitationEvent> {
        self.rx.recv().await
    }
}

async fn speak(content: &dyn ContentService, audio: &dyn AudioOutput, text: &str) -> AppResult<()> {
    match content.synthesize_speech(text).await? {
        Some(pcm) => audio.play(pcm).await,
        None => {
            debug!("Svaret innehöll inget ljud");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    struct GatedSpeech {
        gate: Arc<Semaphore>,
        fail: bool,
    }

    #[async_trait]
    impl ContentService for GatedSpeech {
        async fn fetch_bio(&self, _name: &str, _role: &str) -> AppResult<String> {
            Ok(String::new())
        }

        async fn synthesize_speech(&self, text: &str) -> AppResult<Option<Vec<u8>>> {
            let permit = self.gate.acquire().await.map_err(|e| AppError::other(e.to_string()))?;
            permit.forget();
            if self.fail {
                return Err(AppError::Api {
                    status: 400,
                    body: "ogiltig".into(),
                });
            }
            Ok(Some(text.as_bytes().to_vec()))
        }
    }

    #[derive(Default)]
    struct RecordingAudio {
        played: Mutex<Vec<Vec<u8>>>,
    }

    #[async_trait]
    impl AudioOutput for RecordingAudio {
        async fn play(&self, pcm: Vec<u8>) -> AppResult<()> {
            self.played.lock().unwrap().push(pcm);
            Ok(())
        }
    }

    struct BrokenAudio;

    #[async_trait]
    impl AudioOutput for BrokenAudio {
        async fn play(&self, _pcm: Vec<u8>) -> AppResult<()> {
            panic!("ljudkortet försvann");
        }
    }

    fn reciter(fail: bool) -> (Reciter, Arc<Semaphore>, Arc<RecordingAudio>) {
        let gate = Arc::new(Semaphore::new(0));
        let audio = Arc::new(RecordingAudio::default());
        let content = Arc::new(GatedSpeech {
            gate: Arc::clone(&gate),
            fail,
        });
        let reciter = Reciter::new(content, audio.clone(), Handle::current());
        (reciter, gate, audio)
    }

    #[test]
    fn test_guard_releases_slot_on_drop() {
        let slot = RecitationSlot::new();
        let guard = slot.try_acquire("a").unwrap();
        assert_eq!(slot.loading_id().as_deref(), Some("a"));
        assert_eq!(slot.try_acquire("b").unwrap_err(), "a");

        drop(guard);
        assert!(!slot.is_busy());
        assert!(slot.try_acquire("b").is_ok());
    }

    #[tokio::test]
    async fn test_second_request_ignored_while_first_in_flight() {
        let (mut reciter, gate, audio) = reciter(false);

        assert_eq!(reciter.recite("node-1", "first"), ReciteOutcome::Started);
        assert_eq!(
            reciter.recite("node-2", "second"),
            ReciteOutcome::Rejected {
                busy_with: "node-1".into()
            }
        );
        assert_eq!(reciter.loading_id().as_deref(), Some("node-1"));

        gate.add_permits(1);
        assert_eq!(
            reciter.next_event().await,
            Some(RecitationEvent::Finished { id: "node-1".into() })
        );
        assert!(!reciter.is_busy());

        assert_eq!(reciter.recite("node-3", "third"), ReciteOutcome::Started);
        gate.add_permits(1);
        assert_eq!(
            reciter.next_event().await,
            Some(RecitationEvent::Finished { id: "node-3".into() })
        );

        let played = audio.played.lock().unwrap();
        assert_eq!(*played, vec![b"first".to_vec(), b"third".to_vec()]);
    }

    #[tokio::test]
    async fn test_failure_clears_flag_and_reports() {
        let (mut reciter, gate, audio) = reciter(true);

        assert_eq!(reciter.recite("surah-0", "text"), ReciteOutcome::Started);
        gate.add_permits(1);

        match reciter.next_event().await {
            Some(RecitationEvent::Failed { id, message }) => {
                assert_eq!(id, "surah-0");
                assert!(message.contains("400"));
            }
            other => panic!("oväntad händelse: {:?}", other),
        }
        assert!(!reciter.is_busy());
        assert!(audio.played.lock().unwrap().is_empty());
        assert!(reciter.poll_events().is_empty());
    }

    #[tokio::test]
    async fn test_panic_during_playback_is_reported() {
        let gate = Arc::new(Semaphore::new(1));
        let content = Arc::new(GatedSpeech {
            gate: Arc::clone(&gate),
            fail: false,
        });
        let mut reciter = Reciter::new(content, Arc::new(BrokenAudio), Handle::current());

        assert_eq!(reciter.recite("wazu-niyyah", "text"), ReciteOutcome::Started);
        match reciter.next_event().await {
            Some(RecitationEvent::Failed { id, .. }) => assert_eq!(id, "wazu-niyyah"),
            other => panic!("oväntad händelse: {:?}", other),
        }
        assert!(!reciter.is_busy());
        assert_eq!(reciter.recite("wazu-step-0", "text"), ReciteOutcome::Started);
    }
}
