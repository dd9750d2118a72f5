//! # Starpad User Interface Module
//!
//! The eframe application hosting the gamepad text editor. It owns every
//! piece of per-frame state and drives the input pipeline itself, so the
//! whole program runs on the UI thread.
//!
//! ## Frame Order
//!
//! Every frame does, in this order:
//! 1. drain the [`EventCollector`] and feed each event to [`GamepadState`],
//!    with the [`InputRouter`] receiving the resulting button edges
//! 2. tick the text controller with the time since the previous frame, so a
//!    pending candidate commits after its timeout
//! 3. run the menu entry chosen during step 1, if any
//! 4. render editor, menu popup and status bar
//!
//! ## Input Routing
//!
//! Start toggles the menu. While it is open, presses of the D-pad and face
//! buttons drive the menu. Trigger edges and every release still reach the
//! text controller: its layer, cursor tint and caps-lock follow held buttons
//! and would get stuck otherwise.
//!
//! ## Layout
//!
//! - **Central Panel**: the document, with the pending candidate drawn at the
//!   cursor in the layer's tint
//! - **Bottom Panel**: menu help or the key legend on the left, the latest
//!   notice and a clock on the right
//! - **Menu Window**: centered popup listing the menu entries

pub mod common;
pub mod menu;
pub mod text_editor;

use crate::config::ShellSettings;
use crate::controller::event_collector::{Collecting, EventCollector};
use crate::controller::gamepad_state::{
    ButtonEdge, ButtonEdgeListener, ButtonSymbol, GamepadState,
};
use crate::mapping::cyclic_input::TextInputController;
use crate::persistence::DocumentStore;
use chrono::Local;
use common::{backdrop_frame, cursor_color32, UiColors};
use eframe::egui::{self, text::LayoutJob, FontId, RichText, Stroke, TextFormat};
use menu::{Menu, MenuEntry};
use std::time::{Duration, Instant};
use text_editor::TextEditor;
use tracing::{debug, error, info, warn};

/// Splits button edges between the popup menu and the text controller
pub struct InputRouter {
    pub menu: Menu,
    pub text_input: TextInputController<TextEditor>,
}

impl InputRouter {
    pub fn new(editor: TextEditor) -> Self {
        Self {
            menu: Menu::default(),
            text_input: TextInputController::new(editor),
        }
    }

    pub fn editor(&self) -> &TextEditor {
        self.text_input.sink()
    }

    pub fn editor_mut(&mut self) -> &mut TextEditor {
        self.text_input.sink_mut()
    }
}

impl ButtonEdgeListener for InputRouter {
    fn on_button_edge(&mut self, edge: ButtonEdge, gamepad: &GamepadState) {
        if edge.button == ButtonSymbol::Start {
            if edge.pressed {
                self.menu.toggle();
            }
            return;
        }

        if self.menu.is_active() && edge.pressed && !edge.button.is_trigger() {
            self.menu.on_button_edge(edge);
        } else {
            self.text_input.on_button_edge(edge, gamepad);
        }
    }
}

pub struct StarpadUI {
    collector: EventCollector<Collecting>,
    gamepad: GamepadState,
    router: InputRouter,
    store: DocumentStore,
    settings: ShellSettings,
    last_frame: Instant,
    notice: String,
}

impl StarpadUI {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: ShellSettings,
        collector: EventCollector<Collecting>,
    ) -> Self {
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        let store = DocumentStore::new(settings.documents_dir());
        info!("Documents are stored in {}", store.dir().display());
        let editor = TextEditor::new(initial_text(&store));

        Self {
            collector,
            gamepad: GamepadState::new(),
            router: InputRouter::new(editor),
            store,
            settings,
            last_frame: Instant::now(),
            notice: String::new(),
        }
    }

    fn poll_input(&mut self) {
        for event in self.collector.drain() {
            self.gamepad.handle_event(&event, &mut self.router);
        }

        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.last_frame = now;
        self.router.text_input.update(elapsed, &self.gamepad);
    }

    fn run_menu_entry(&mut self, entry: MenuEntry, ctx: &egui::Context) {
        info!("Menu entry chosen: {}", entry);
        match entry {
            MenuEntry::NewFile => {
                debug!("Clearing {} bytes", self.router.editor().text().len());
                self.router.editor_mut().clear();
                self.notice = "New file".to_string();
            }
            MenuEntry::Open => match self.store.open_latest() {
                Ok(Some((path, text))) => {
                    self.router.editor_mut().set_text(text);
                    self.notice = format!("Opened {}", file_name(&path));
                }
                Ok(None) => {
                    warn!("No saved documents in {}", self.store.dir().display());
                    self.notice = "No saved documents".to_string();
                }
                Err(e) => {
                    error!("{}", e);
                    self.notice = "Open failed".to_string();
                }
            },
            MenuEntry::Save | MenuEntry::SaveAs => {
                match self.store.save(self.router.editor().text()) {
                    Ok(path) => self.notice = format!("Saved {}", file_name(&path)),
                    Err(e) => {
                        error!("{}", e);
                        self.notice = "Save failed".to_string();
                    }
                }
            }
            MenuEntry::About => {
                self.notice = format!(
                    "{} {}",
                    env!("CARGO_PKG_NAME"),
                    env!("CARGO_PKG_VERSION")
                );
            }
            MenuEntry::Quit => {
                info!("Quit requested");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }

    fn editor_layout(&self) -> LayoutJob {
        let editor = self.router.editor();
        let font_id = FontId::monospace(self.settings.font_size);
        let tint = cursor_color32(editor.cursor_color());

        let mut job = LayoutJob::default();
        job.append(
            editor.text(),
            0.0,
            TextFormat {
                font_id: font_id.clone(),
                color: UiColors::TEXT,
                ..Default::default()
            },
        );

        // The cursor cell: the pending candidate, or a blank, underlined in the layer's tint
        let cell = editor.cursor_preview().unwrap_or(' ').to_string();
        job.append(
            &cell,
            0.0,
            TextFormat {
                font_id,
                color: tint,
                underline: Stroke::new(2.0, tint),
                ..Default::default()
            },
        );
        job
    }

    fn status_text(&self) -> String {
        if self.router.menu.is_active() {
            self.router.menu.selected().help().to_string()
        } else {
            self.router.text_input.status_line(&self.gamepad)
        }
    }
}

impl eframe::App for StarpadUI {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_input();

        if let Some(entry) = self.router.menu.take_chosen() {
            self.run_menu_entry(entry, ctx);
        }

        let status_size = self.settings.font_size * 0.8;

        egui::TopBottomPanel::bottom("status_panel")
            .show_separator_line(false)
            .frame(backdrop_frame())
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(self.status_text())
                            .monospace()
                            .size(status_size)
                            .color(UiColors::STATUS),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let (column, row) = self.router.editor().cursor_cell();
                        let clock = Local::now().format("%Y-%m-%d %H:%M:%S");
                        ui.label(
                            RichText::new(format!("Ln {} Col {}  {}", row + 1, column + 1, clock))
                                .monospace()
                                .size(status_size)
                                .color(UiColors::STATUS),
                        );
                        if !self.notice.is_empty() {
                            ui.label(
                                RichText::new(&self.notice)
                                    .monospace()
                                    .size(status_size)
                                    .color(UiColors::TEXT),
                            );
                        }
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(backdrop_frame())
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        ui.label(self.editor_layout());
                    });
            });

        if self.router.menu.is_active() {
            self.router.menu.render(ctx, self.settings.font_size);
        }

        ctx.request_repaint_after(Duration::from_millis(self.settings.frame_interval_ms));
    }
}

const GREETING: &str = "Hello, Galaxy!\n";

/// Resumes from the newest saved document, or greets when there is none
fn initial_text(store: &DocumentStore) -> String {
    match store.open_latest() {
        Ok(Some((path, text))) => {
            info!("Resuming {}", path.display());
            text
        }
        Ok(None) => GREETING.to_string(),
        Err(e) => {
            warn!("Could not resume last document: {}", e);
            GREETING.to_string()
        }
    }
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::gamepad_state::{AxisChannel, InputEvent};
    use crate::mapping::sink::CursorColor;

    struct Host {
        gamepad: GamepadState,
        router: InputRouter,
    }

    impl Host {
        fn new() -> Self {
            Self {
                gamepad: GamepadState::new(),
                router: InputRouter::new(TextEditor::default()),
            }
        }

        fn feed(&mut self, event: InputEvent) {
            self.gamepad.handle_event(&event, &mut self.router);
        }

        fn tap(&mut self, button: ButtonSymbol) {
            let code = button.code().unwrap();
            self.feed(InputEvent::ButtonDown { code, repeat: false });
            self.feed(InputEvent::ButtonUp { code });
        }
    }

    #[test]
    fn start_toggles_menu_and_face_buttons_follow_it() {
        let mut host = Host::new();
        host.tap(ButtonSymbol::Start);
        assert!(host.router.menu.is_active());

        host.tap(ButtonSymbol::DPadDown);
        host.tap(ButtonSymbol::A);
        assert!(!host.router.menu.is_active());
        assert_eq!(host.router.menu.take_chosen(), Some(MenuEntry::Open));
        assert_eq!(host.router.text_input.session().pending_char(), None);

        host.tap(ButtonSymbol::A);
        assert_eq!(host.router.text_input.session().pending_char(), Some('a'));
    }

    #[test]
    fn triggers_reach_text_input_while_menu_is_open() {
        let mut host = Host::new();
        host.tap(ButtonSymbol::Start);

        host.feed(InputEvent::AxisMotion {
            code: AxisChannel::TriggerRight.code(),
            value: i16::MAX,
        });
        assert_eq!(host.router.editor().cursor_color(), CursorColor::ActionLayer);

        host.feed(InputEvent::AxisMotion {
            code: AxisChannel::TriggerRight.code(),
            value: 0,
        });
        assert_eq!(host.router.editor().cursor_color(), CursorColor::Default);
        assert!(host.router.menu.is_active());
    }

    #[test]
    fn caps_lock_ends_when_shoulder_is_released_behind_the_menu() {
        let mut host = Host::new();
        host.feed(InputEvent::ButtonDown {
            code: ButtonSymbol::LeftShoulder.code().unwrap(),
            repeat: false,
        });
        host.tap(ButtonSymbol::A);
        host.tap(ButtonSymbol::X);
        assert!(host.router.text_input.session().caps_lock());

        host.tap(ButtonSymbol::Start);
        host.feed(InputEvent::ButtonUp {
            code: ButtonSymbol::LeftShoulder.code().unwrap(),
        });
        host.tap(ButtonSymbol::Start);
        assert!(!host.router.menu.is_active());
        assert!(!host.router.text_input.session().caps_lock());

        host.tap(ButtonSymbol::Y);
        host.tap(ButtonSymbol::B);
        assert_eq!(host.router.editor().text(), "Adg");
    }

    #[test]
    fn releases_behind_the_menu_do_not_type() {
        let mut host = Host::new();
        host.tap(ButtonSymbol::Start);
        host.tap(ButtonSymbol::DPadDown);
        assert_eq!(host.router.menu.selected(), MenuEntry::Open);
        assert_eq!(host.router.text_input.session().pending_char(), None);
        assert_eq!(host.router.editor().text(), "");
    }

    fn scratch_store(tag: &str) -> DocumentStore {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        DocumentStore::new(std::env::temp_dir().join(format!(
            "starpad-ui-{}-{}-{}",
            tag,
            std::process::id(),
            nanos
        )))
    }

    #[test]
    fn starts_from_greeting_without_saved_documents() {
        let store = scratch_store("greeting");
        assert_eq!(initial_text(&store), GREETING);
    }

    #[test]
    fn resumes_newest_saved_document() {
        let store = scratch_store("resume");
        store.save("draft\nnotes").unwrap();
        assert_eq!(initial_text(&store), "draft\nnotes");
        std::fs::remove_dir_all(store.dir()).unwrap();
    }

    #[test]
    fn file_name_strips_directories() {
        let path = std::path::Path::new("/tmp/docs/starpad-20250101-120000.txt");
        assert_eq!(file_name(path), "starpad-20250101-120000.txt");
    }
}
