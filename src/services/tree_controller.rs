//! Interaktion med släktträdet
//!
//! Äger trädets ögonblicksbild, senaste layout, kameran och vald person.
//! Klick växlar noden, lägger ut trädet igen, centrerar kameran och begär en
//! kort biografi i bakgrunden. Svar som hör till en äldre förfrågan kastas.

use std::sync::Arc;
use std::time::Instant;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

use crate::models::{Person, PersonSide};
use crate::services::camera::{Camera, ViewTransform};
use crate::services::content::ContentService;
use crate::services::tree_layout::{LayoutEngine, LayoutNode, TreeLayout, ViewportSize};
use crate::services::tree_model::{AncestryTree, Transition};

/// Zoom när en klickad nod centreras
pub const READABLE_ZOOM: f32 = 0.9;
/// Zoom vid hopp till toppen eller botten
pub const JUMP_ZOOM: f32 = 1.0;
/// Visas när biografin inte kunde hämtas
pub const BIO_FALLBACK: &str = "Historiken finns bevarad i släktens arkiv.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub node_id: String,
    pub side: PersonSide,
}

/// Nod som kameran centrerar på tills användaren själv panorerar eller zoomar
#[derive(Debug, Clone, PartialEq)]
struct Focus {
    node_id: String,
    zoom: f32,
}

#[derive(Debug)]
struct BioResponse {
    ticket: u64,
    text: String,
}

pub struct TreeController {
    tree: AncestryTree,
    engine: LayoutEngine,
    layout: Option<TreeLayout>,
    viewport: ViewportSize,
    camera: Camera,
    focus: Option<Focus>,
    selection: Option<Selection>,
    bio_loading: bool,
    bio_text: Option<String>,
    bio_ticket: u64,
    content: Arc<dyn ContentService>,
    runtime: Handle,
    tx: UnboundedSender<BioResponse>,
    rx: UnboundedReceiver<BioResponse>,
}

impl TreeController {
    pub fn new(root: &Person, content: Arc<dyn ContentService>, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        let tree = AncestryTree::build(root);
        let selection = Some(Selection {
            node_id: tree.root().id().to_string(),
            side: PersonSide::Main,
        });

        Self {
            tree,
            engine: LayoutEngine::new(),
            layout: None,
            viewport: ViewportSize::default(),
            camera: Camera::new(),
            focus: None,
            selection,
            bio_loading: false,
            bio_text: None,
            bio_ticket: 0,
            content,
            runtime,
            tx,
            rx,
        }
    }

    /// Byt datamängd. Trädet byggs om från början om datamängden skiljer sig,
    /// även när två datamängder delar rot-id.
    pub fn set_dataset(&mut self, root: &Person) -> bool {
        if self.tree.root().person.as_ref() == root {
            return false;
        }

        info!("Bygger om släktträdet från {}", root.name);
        self.tree = AncestryTree::build(root);
        self.engine.reset();
        self.layout = None;
        self.focus = None;
        self.selection = Some(Selection {
            node_id: root.id.clone(),
            side: PersonSide::Main,
        });
        self.reset_bio();
        self.relayout();
        true
    }

    pub fn set_content(&mut self, content: Arc<dyn ContentService>) {
        self.content = content;
    }

    /// Ny storlek på ritytan ger ett nytt layoutpass. En fokuserad nod hålls
    /// centrerad, även om avstånden byts mellan smalt och brett läge.
    pub fn set_viewport(&mut self, viewport: ViewportSize) {
        if self.viewport == viewport && self.layout.is_some() {
            return;
        }
        self.viewport = viewport;
        self.relayout();
        self.follow_focus();
    }

    fn follow_focus(&mut self) {
        let Some(focus) = self.focus.clone() else {
            return;
        };
        if self.viewport.is_degenerate() {
            return;
        }
        if let Some((x, y)) = self.position_of(&focus.node_id) {
            let target =
                ViewTransform::centered_on(x, y, focus.zoom, self.viewport.width, self.viewport.height);
            self.camera.retarget(target);
        }
    }

    fn relayout(&mut self) {
        let pass = self.engine.run(self.tree.root(), self.viewport);
        if let Some(initial) = pass.initial_camera {
            debug!("Startkamera {:?}", initial);
            self.camera.set(initial);
        }
        self.layout = Some(pass.layout);
    }

    /// Klick på huvudpersonen eller partnern i en nod
    pub fn click(&mut self, node_id: &str, side: PersonSide, now: Instant) -> bool {
        let Some((tree, transition)) = self.tree.toggle(node_id) else {
            warn!("Klick på okänd nod {}", node_id);
            return false;
        };

        if let Transition::Expanded { collapsed_siblings } = &transition {
            if !collapsed_siblings.is_empty() {
                debug!("Fällde ihop syskon {:?}", collapsed_siblings);
            }
        }

        self.tree = tree;
        self.relayout();
        self.focus_on(node_id, READABLE_ZOOM, now);

        self.selection = Some(Selection {
            node_id: node_id.to_string(),
            side,
        });

        let target = self.tree.find(node_id).map(|node| {
            let person = &node.person;
            (
                person.name_for(side).map(str::to_string),
                person.role_for(side).unwrap_or_default().to_string(),
            )
        });
        match target {
            Some((Some(name), role)) => self.request_bio(name, role),
            _ => {
                self.bio_ticket += 1;
                self.bio_loading = false;
                self.bio_text = None;
            }
        }

        true
    }

    fn position_of(&self, node_id: &str) -> Option<(f32, f32)> {
        self.layout
            .as_ref()
            .and_then(|layout| layout.find(node_id))
            .map(|node| (node.x, node.y))
    }

    fn focus_on(&mut self, node_id: &str, zoom: f32, now: Instant) {
        self.focus = Some(Focus {
            node_id: node_id.to_string(),
            zoom,
        });
        if self.viewport.is_degenerate() {
            return;
        }
        if let Some((x, y)) = self.position_of(node_id) {
            let target =
                ViewTransform::centered_on(x, y, zoom, self.viewport.width, self.viewport.height);
            self.camera.animate_to(target, now);
        }
    }

    fn jump_to(&mut self, id: Option<String>, now: Instant) -> Option<String> {
        let id = id?;
        self.focus_on(&id, JUMP_ZOOM, now);
        Some(id)
    }

    fn layout_node(&self, pick: fn(&TreeLayout) -> Option<&LayoutNode>) -> Option<String> {
        self.layout.as_ref().and_then(pick).map(|node| node.id.clone())
    }

    /// Centrera på roten. Returnerar rotens id, `None` utan layout.
    pub fn jump_to_top(&mut self, now: Instant) -> Option<String> {
        let node = self.layout_node(TreeLayout::root);
        self.jump_to(node, now)
    }

    /// Centrera på den djupaste synliga noden (först i bredden-först-ordning vid lika djup)
    pub fn jump_to_bottom(&mut self, now: Instant) -> Option<String> {
        let node = self.layout_node(TreeLayout::deepest);
        self.jump_to(node, now)
    }

    fn request_bio(&mut self, name: String, role: String) {
        self.bio_ticket += 1;
        self.bio_loading = true;
        self.bio_text = None;

        let ticket = self.bio_ticket;
        let content = Arc::clone(&self.content);
        let tx = self.tx.clone();
        debug!("Begär biografi #{} för {}", ticket, name);

        self.runtime.spawn(async move {
            let text = match content.fetch_bio(&name, &role).await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Biografi för {} kunde inte hämtas: {}", name, e);
                    BIO_FALLBACK.to_string()
                }
            };
            let _ = tx.send(BioResponse { ticket, text });
        });
    }

    fn reset_bio(&mut self) {
        self.bio_ticket += 1;
        self.bio_loading = false;
        self.bio_text = None;
    }

    fn apply_bio(&mut self, response: BioResponse) -> bool {
        if response.ticket != self.bio_ticket || !self.bio_loading {
            debug!("Kastar inaktuell biografi #{}", response.ticket);
            return false;
        }
        self.bio_loading = false;
        self.bio_text = Some(response.text);
        true
    }

    /// Ta emot färdiga biografier. Returnerar true om panelen ändrades.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(response) = self.rx.try_recv() {
            changed |= self.apply_bio(response);
        }
        changed
    }

    /// Vänta på nästa biografisvar. Returnerar true om det var aktuellt.
    pub async fn next_bio_response(&mut self) -> bool {
        match self.rx.recv().await {
            Some(response) => self.apply_bio(response),
            None => false,
        }
    }

    /// Stäng sidopanelen
    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.reset_bio();
    }

    pub fn tick(&mut self, now: Instant) -> bool {
        self.camera.tick(now)
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.focus = None;
        self.camera.pan(dx, dy);
    }

    pub fn zoom_at(&mut self, sx: f32, sy: f32, factor: f32) {
        self.focus = None;
        self.camera.zoom_at(sx, sy, factor);
    }

    pub fn tree(&self) -> &AncestryTree {
        &self.tree
    }

    pub fn layout(&self) -> Option<&TreeLayout> {
        self.layout.as_ref()
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn transform(&self) -> ViewTransform {
        self.camera.transform()
    }

    pub fn is_animating(&self) -> bool {
        self.camera.is_animating()
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Vald person och sida
    pub fn selected_person(&self) -> Option<(&Person, PersonSide)> {
        let selection = self.selection.as_ref()?;
        let node = self.tree.find(&selection.node_id)?;
        Some((node.person.as_ref(), selection.side))
    }

    pub fn is_bio_loading(&self) -> bool {
        self.bio_loading
    }

    pub fn bio_text(&self) -> Option<&str> {
        self.bio_text.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::tree_layout::LayoutSpacing;
    use crate::utils::{AppError, AppResult};
    use async_trait::async_trait;
    use tokio::sync::Semaphore;

    const VIEWPORT: ViewportSize = ViewportSize {
        width: 1280.0,
        height: 800.0,
    };

    /// Svarar direkt, utom för "Långsam" som väntar på grinden
    struct FakeContent {
        gate: Arc<Semaphore>,
        fail: bool,
    }

    impl FakeContent {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                gate: Arc::new(Semaphore::new(0)),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                gate: Arc::new(Semaphore::new(0)),
                fail: true,
            })
        }
    }

    #[async_trait]
    impl ContentService for FakeContent {
        async fn fetch_bio(&self, name: &str, role: &str) -> AppResult<String> {
            if name == "Långsam" {
                let permit = self
                    .gate
                    .acquire()
                    .await
                    .map_err(|e| AppError::other(e.to_string()))?;
                permit.forget();
            }
            if self.fail {
                return Err(AppError::Api {
                    status: 500,
                    body: "nere".into(),
                });
            }
            Ok(format!("{} ({})", name, role))
        }

        async fn synthesize_speech(&self, _text: &str) -> AppResult<Option<Vec<u8>>> {
            Ok(None)
        }
    }

    fn family() -> Person {
        Person::new("r", "Rot").with_role("Root").with_children(vec![
            Person::new("a", "Långsam")
                .with_role("S")
                .with_spouse("Amina", "W")
                .with_children(vec![
                    Person::new("a1", "Ali").with_role("S").with_children(vec![
                        Person::new("a1x", "Bilal").with_role("S"),
                    ]),
                    Person::new("a2", "Fatima").with_role("D"),
                ]),
            Person::new("b", "Bashir").with_role("S"),
            Person::new("c", "Karim").with_role("S").with_children(vec![
                Person::new("c1", "Omar").with_role("S"),
            ]),
        ])
    }

    fn controller(content: Arc<FakeContent>) -> TreeController {
        let mut controller = TreeController::new(&family(), content, Handle::current());
        controller.set_viewport(VIEWPORT);
        controller
    }

    fn screen_center_of(controller: &TreeController, id: &str) -> (f32, f32) {
        let node = controller.layout().unwrap().find(id).unwrap();
        controller.camera().target().apply(node.x, node.y)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-2
    }

    #[tokio::test]
    async fn test_initial_state() {
        let controller = controller(FakeContent::ok());

        let selection = controller.selection().unwrap();
        assert_eq!(selection.node_id, "r");
        assert_eq!(selection.side, PersonSide::Main);
        assert!(!controller.is_bio_loading());
        assert!(controller.bio_text().is_none());

        let layout = controller.layout().unwrap();
        assert_eq!(layout.nodes.len(), 1);
        assert_eq!(controller.transform(), ViewTransform::new(640.0, 800.0 / 3.0, 0.65));
    }

    #[tokio::test]
    async fn test_initial_camera_only_once_per_tree() {
        let mut controller = controller(FakeContent::ok());
        controller.pan(25.0, 10.0);
        let panned = controller.transform();

        controller.set_viewport(ViewportSize::new(1000.0, 700.0));
        assert_eq!(controller.transform(), panned);

        // Ny datamängd ger ny startkamera
        let other = Person::new("m", "Mödernet");
        assert!(controller.set_dataset(&other));
        assert_eq!(controller.transform(), ViewTransform::new(500.0, 700.0 / 3.0, 0.65));
        assert!(!controller.set_dataset(&other));
    }

    #[tokio::test]
    async fn test_dataset_with_same_root_id_is_rebuilt() {
        let mut controller = controller(FakeContent::ok());
        controller.click("r", PersonSide::Main, Instant::now());

        let renamed = Person::new("r", "Annan rot").with_children(vec![Person::new("x", "Xena")]);
        assert!(controller.set_dataset(&renamed));
        assert!(controller.tree().find("a").is_none());
        assert!(controller.tree().find("x").is_some());
        assert!(!controller.set_dataset(&renamed));
    }

    #[tokio::test]
    async fn test_clicked_node_stays_centered_when_canvas_shrinks() {
        let mut controller = TreeController::new(&family(), FakeContent::ok(), Handle::current());
        controller.set_viewport(ViewportSize::new(1000.0, 800.0));
        controller.clear_selection();

        let now = Instant::now();
        controller.click("r", PersonSide::Main, now);
        controller.click("a", PersonSide::Main, now);
        assert_eq!(controller.layout().unwrap().spacing, LayoutSpacing::WIDE);

        // Sidopanelen öppnas och ritytan blir smal
        controller.set_viewport(ViewportSize::new(660.0, 800.0));
        assert_eq!(controller.layout().unwrap().spacing, LayoutSpacing::NARROW);
        assert!(controller.is_animating());

        controller.tick(now + crate::services::camera::ANIMATION_DURATION);
        let node = controller.layout().unwrap().find("a").unwrap();
        let (sx, sy) = controller.transform().apply(node.x, node.y);
        assert!(approx(sx, 330.0) && approx(sy, 400.0));
        assert_eq!(controller.transform().k, READABLE_ZOOM);
    }

    #[tokio::test]
    async fn test_gesture_releases_focus() {
        let mut controller = controller(FakeContent::ok());
        let now = Instant::now();
        controller.click("r", PersonSide::Main, now);
        controller.tick(now + crate::services::camera::ANIMATION_DURATION);

        controller.pan(40.0, 0.0);
        let panned = controller.transform();
        controller.set_viewport(ViewportSize::new(1100.0, 800.0));
        assert_eq!(controller.transform(), panned);
    }

    #[tokio::test]
    async fn test_degenerate_viewport_defers_initial_camera() {
        let mut controller = TreeController::new(&family(), FakeContent::ok(), Handle::current());
        controller.set_viewport(ViewportSize::new(0.0, 0.0));
        assert!(controller.layout().unwrap().is_empty());
        assert_eq!(controller.transform(), ViewTransform::IDENTITY);
        assert_eq!(controller.jump_to_top(Instant::now()), None);

        controller.set_viewport(ViewportSize::new(600.0, 900.0));
        assert_eq!(controller.transform(), ViewTransform::new(300.0, 300.0, 0.45));
    }

    #[tokio::test]
    async fn test_click_centers_selects_and_fetches_bio() {
        let mut controller = controller(FakeContent::ok());
        let now = Instant::now();

        assert!(controller.click("r", PersonSide::Main, now));
        assert_eq!(controller.layout().unwrap().nodes.len(), 4);
        assert!(controller.is_bio_loading());

        let target = controller.camera().target();
        assert_eq!(target.k, READABLE_ZOOM);
        let (sx, sy) = screen_center_of(&controller, "r");
        assert!(approx(sx, 640.0) && approx(sy, 400.0));

        assert!(controller.next_bio_response().await);
        assert!(!controller.is_bio_loading());
        assert_eq!(controller.bio_text(), Some("Rot (Root)"));
    }

    #[tokio::test]
    async fn test_spouse_click_selects_spouse() {
        let mut controller = controller(FakeContent::ok());
        let now = Instant::now();
        controller.click("r", PersonSide::Main, now);
        controller.next_bio_response().await;

        assert!(controller.click("a", PersonSide::Spouse, now));
        let (person, side) = controller.selected_person().unwrap();
        assert_eq!(person.id, "a");
        assert_eq!(side, PersonSide::Spouse);
        assert!(controller.tree().find("a").unwrap().is_expanded());

        assert!(controller.next_bio_response().await);
        assert_eq!(controller.bio_text(), Some("Amina (W)"));
    }

    #[tokio::test]
    async fn test_bio_failure_shows_fallback() {
        let mut controller = controller(FakeContent::failing());
        controller.click("r", PersonSide::Main, Instant::now());
        assert!(controller.is_bio_loading());

        assert!(controller.next_bio_response().await);
        assert!(!controller.is_bio_loading());
        assert_eq!(controller.bio_text(), Some(BIO_FALLBACK));
    }

    #[tokio::test]
    async fn test_stale_bio_is_discarded() {
        let content = FakeContent::ok();
        let gate = Arc::clone(&content.gate);
        let mut controller = controller(content);
        let now = Instant::now();

        controller.click("r", PersonSide::Main, now);
        assert!(controller.next_bio_response().await);

        // "Långsam" hänger tills grinden öppnas, "Bashir" svarar direkt
        controller.click("a", PersonSide::Main, now);
        controller.click("b", PersonSide::Main, now);
        assert!(controller.next_bio_response().await);
        assert_eq!(controller.bio_text(), Some("Bashir (S)"));

        gate.add_permits(1);
        assert!(!controller.next_bio_response().await);
        assert_eq!(controller.bio_text(), Some("Bashir (S)"));
        assert_eq!(controller.selection().unwrap().node_id, "b");
    }

    #[tokio::test]
    async fn test_closed_panel_discards_pending_bio() {
        let mut controller = controller(FakeContent::ok());
        controller.click("r", PersonSide::Main, Instant::now());
        controller.clear_selection();

        assert!(!controller.next_bio_response().await);
        assert!(controller.selection().is_none());
        assert!(controller.bio_text().is_none());
        assert!(!controller.is_bio_loading());
    }

    #[tokio::test]
    async fn test_unknown_node_is_ignored() {
        let mut controller = controller(FakeContent::ok());
        let revision = controller.tree().revision();
        assert!(!controller.click("saknas", PersonSide::Main, Instant::now()));
        assert_eq!(controller.tree().revision(), revision);
        assert_eq!(controller.selection().unwrap().node_id, "r");
    }

    #[tokio::test]
    async fn test_jump_to_bottom_centers_deepest_node() {
        let mut controller = controller(FakeContent::ok());
        let now = Instant::now();
        controller.click("r", PersonSide::Main, now);
        controller.click("a", PersonSide::Main, now);
        controller.click("a1", PersonSide::Main, now);

        let layout = controller.layout().unwrap();
        assert_eq!(layout.max_depth(), 3);

        assert_eq!(controller.jump_to_bottom(now).as_deref(), Some("a1x"));
        assert_eq!(controller.camera().target().k, JUMP_ZOOM);
        let (sx, sy) = screen_center_of(&controller, "a1x");
        assert!(approx(sx, 640.0) && approx(sy, 400.0));
        assert_eq!(controller.layout().unwrap().find("a1x").unwrap().depth, 3);

        assert_eq!(controller.jump_to_top(now).as_deref(), Some("r"));
        let (sx, sy) = screen_center_of(&controller, "r");
        assert!(approx(sx, 640.0) && approx(sy, 400.0));
    }

    #[tokio::test]
    async fn test_jump_without_layout_is_noop() {
        let mut controller = TreeController::new(&family(), FakeContent::ok(), Handle::current());
        let now = Instant::now();
        assert_eq!(controller.jump_to_top(now), None);
        assert_eq!(controller.jump_to_bottom(now), None);
        assert!(!controller.is_animating());
    }

    #[tokio::test]
    async fn test_expanding_sibling_collapses_other() {
        let mut controller = controller(FakeContent::ok());
        let now = Instant::now();
        controller.click("r", PersonSide::Main, now);
        controller.click("a", PersonSide::Main, now);
        controller.click("c", PersonSide::Main, now);

        assert!(controller.tree().find("a").unwrap().is_collapsed());
        assert!(controller.tree().find("c").unwrap().is_expanded());
        let layout = controller.layout().unwrap();
        assert!(layout.find("a1").is_none());
        assert!(layout.find("c1").is_some());
    }
}
