//! WebAssembly bindings via wasm-bindgen for browser integration.
//!
//! This module is only compiled when the `web` feature is enabled.
//!
//! # Usage
//!
//! Build with wasm-pack:
//! ```bash
//! wasm-pack build --target web --features web
//! ```
//!
//! # JavaScript Example
//!
//! ```javascript
//! import init, { pedalboard_init, PedalboardStack } from './pedalboard.js';
//!
//! await init();
//! pedalboard_init();
//!
//! const stack = new PedalboardStack();
//! const id = stack.register_module("distortion");
//!
//! // dnd-kit handlers
//! onDragStart = (e) => stack.drag_start(e.active?.id);
//! onDragEnd = (e) => stack.drag_end(e.active?.id, e.over?.id);
//!
//! const view = JSON.parse(stack.view_json());
//! ```

use wasm_bindgen::prelude::*;

use crate::audio_buffer::AudioBuffer;
use crate::config::EngineConfig;
use crate::controller::StackController;
use crate::dnd::{Modifier, Rect, Translate};
use crate::effects::{EffectKind, effect_catalog};
use crate::state::{AudioClip, AudioFile, ModuleId};

// ═══════════════════════════════════════════════════════════════════════════
// Initialization
// ═══════════════════════════════════════════════════════════════════════════

/// Initialize the wasm module. Call this once before using any other functions.
/// Sets up panic hooks and console logging.
#[wasm_bindgen]
pub fn pedalboard_init() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug).ok();
}

/// JSON description of every effect kind for the Add-Module chooser.
#[wasm_bindgen]
pub fn effect_catalog_json() -> Result<String, JsValue> {
    serde_json::to_string(&effect_catalog()).map_err(to_js)
}

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_id(id: Option<String>) -> Option<ModuleId> {
    id.as_deref().and_then(ModuleId::parse)
}

// ═══════════════════════════════════════════════════════════════════════════
// Stack (UI-side handle)
// ═══════════════════════════════════════════════════════════════════════════

/// The stack controller, as seen from JavaScript.
///
/// Identifiers cross the boundary as strings. Strings that are not valid
/// identifiers are treated as missing.
#[wasm_bindgen]
pub struct PedalboardStack {
    inner: StackController,
}

#[wasm_bindgen]
impl PedalboardStack {
    /// Create a stack with default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> PedalboardStack {
        Self {
            inner: StackController::default(),
        }
    }

    /// Create a stack from a JSON configuration document.
    pub fn with_config(config_json: &str) -> Result<PedalboardStack, JsValue> {
        let config = EngineConfig::from_json_str(config_json).map_err(to_js)?;
        Ok(Self {
            inner: StackController::new(config),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stack Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Append a module. Returns its identifier.
    pub fn register_module(&mut self, kind: &str) -> Result<String, JsValue> {
        let kind: EffectKind = kind.parse().map_err(to_js)?;
        Ok(self.inner.register_module(kind).to_string())
    }

    /// Remove the module at `index`. Returns false if there was none.
    pub fn unregister_module(&mut self, index: usize) -> bool {
        self.inner.unregister_module(index)
    }

    /// Keyboard reorder.
    pub fn nudge_module(&mut self, id: &str, offset: i32) -> bool {
        match ModuleId::parse(id) {
            Some(id) => self.inner.nudge_module(id, offset as isize),
            None => false,
        }
    }

    /// Set a parameter value.
    pub fn set_param(&mut self, id: &str, param_id: u32, value: f32) -> bool {
        match ModuleId::parse(id) {
            Some(id) => self.inner.set_param(id, param_id, value),
            None => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Drag Session
    // ─────────────────────────────────────────────────────────────────────────

    pub fn drag_start(&mut self, active: Option<String>) -> bool {
        self.inner.handle_drag_start(parse_id(active))
    }

    pub fn drag_move(&mut self, x: f32, y: f32) {
        self.inner.handle_drag_move(Translate::new(x, y));
    }

    /// Returns true if the stack was reordered.
    pub fn drag_end(&mut self, active: Option<String>, over: Option<String>) -> bool {
        self.inner.handle_drag_end(parse_id(active), parse_id(over))
    }

    pub fn drag_cancel(&mut self) {
        self.inner.handle_drag_cancel();
    }

    /// Keep drags inside the window. Call on resize and at drag start.
    pub fn set_window_bounds(
        &mut self,
        width: f32,
        height: f32,
        item_left: f32,
        item_top: f32,
        item_width: f32,
        item_height: f32,
    ) {
        let mut modifiers = self.inner.config().drag_modifiers();
        modifiers.push(Modifier::RestrictToWindowEdges {
            bounds: Rect::new(0.0, 0.0, width, height),
            item: Rect::new(item_left, item_top, item_width, item_height),
        });
        self.inner.set_modifiers(modifiers);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Audio Input / Recorder
    // ─────────────────────────────────────────────────────────────────────────

    /// Publish a decoded file. `samples` are planar.
    pub fn load_file(
        &mut self,
        name: &str,
        mime_type: &str,
        sample_rate: u32,
        channels: usize,
        samples: Vec<f32>,
    ) -> Result<(), JsValue> {
        if sample_rate == 0 {
            return Err(JsValue::from_str("sample rate must be positive"));
        }
        let channels = channels.max(1);
        let frames = samples.len() / channels;
        let clip = AudioClip {
            sample_rate,
            channels,
            frames,
            samples,
        };
        self.inner
            .load_file(AudioFile::new(name, mime_type).with_clip(clip));
        Ok(())
    }

    pub fn clear_file(&mut self) {
        self.inner.set_current_file(None);
    }

    pub fn set_file_is_audio(&mut self, is_audio: bool) {
        self.inner.set_file_is_audio(is_audio);
    }

    pub fn file_is_audio(&self) -> bool {
        self.inner.file().file_is_audio
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Snapshot of the stack for the UI, as JSON.
    pub fn view_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.view()).map_err(to_js)
    }

    /// Number of modules on the stack.
    pub fn module_count(&self) -> u32 {
        self.inner.stack().len() as u32
    }

    /// Process one planar block in place (AudioWorklet).
    pub fn process(&mut self, samples: &mut [f32], channels: usize) {
        let mut buffer = AudioBuffer::new(samples, channels);
        self.inner.process(&mut buffer);
    }

    /// Render the current file through the stack. Returns planar samples,
    /// or an empty array if there is nothing playable.
    pub fn render_current(&mut self) -> Vec<f32> {
        self.inner
            .render_current()
            .map(|clip| clip.samples)
            .unwrap_or_default()
    }
}

impl Default for PedalboardStack {
    fn default() -> Self {
        Self::new()
    }
}
