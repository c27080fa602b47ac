// src/controller.rs
//
// The stack controller.
//
// Single source of truth for module order, the drag session and the
// current audio file. Every UI event lands here, runs to completion, and
// leaves the state ready for the next `view()`.

use log::{debug, trace};

use crate::audio_buffer::AudioBuffer;
use crate::chain::EffectChain;
use crate::config::EngineConfig;
use crate::dnd::{Modifier, Translate};
use crate::effect::ProcessContext;
use crate::effects::EffectKind;
use crate::state::{
    AudioClip, AudioFile, AudioFileRef, Command, CommandResult, DragSession, ModuleId,
    ModuleStack,
};
use crate::view::StackView;

/// Owns the ordered module sequence and everything derived from it.
pub struct StackController {
    config: EngineConfig,
    stack: ModuleStack,
    drag: DragSession,
    file: AudioFileRef,
    chain: EffectChain,
    modifiers: Vec<Modifier>,
}

impl StackController {
    pub fn new(config: EngineConfig) -> Self {
        let modifiers = config.drag_modifiers();
        Self {
            config,
            stack: ModuleStack::new(),
            drag: DragSession::new(),
            file: AudioFileRef::default(),
            chain: EffectChain::new(),
            modifiers,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn stack(&self) -> &ModuleStack {
        &self.stack
    }

    pub fn drag(&self) -> &DragSession {
        &self.drag
    }

    pub fn file(&self) -> &AudioFileRef {
        &self.file
    }

    /// Replace the drag modifiers (e.g. when the window is resized).
    pub fn set_modifiers(&mut self, modifiers: Vec<Modifier>) {
        self.modifiers = modifiers;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Stack mutations
    // ─────────────────────────────────────────────────────────────────────

    /// Append a module of `kind` with a fresh identifier.
    pub fn register_module(&mut self, kind: EffectKind) -> ModuleId {
        let id = self.stack.append(kind);
        if let Some(record) = self.stack.get(id) {
            self.chain.insert(id, kind, &record.params);
        }
        debug!("Registered {} as {} at {}", kind, id, self.stack.len() - 1);
        id
    }

    /// Remove the module at `position`. Out of range is ignored.
    ///
    /// Removing the module that is currently being dragged cancels the drag.
    pub fn unregister_module(&mut self, position: usize) -> bool {
        let Some(record) = self.stack.remove_at(position) else {
            trace!("Unregister ignored: no module at {}", position);
            return false;
        };
        self.chain.remove(record.id);

        if self.drag.is_active(record.id) {
            debug!("Active module {} removed mid-drag; cancelling drag", record.id);
            self.drag.end();
        }

        debug!("Unregistered {} ({}) from {}", record.kind, record.id, position);
        true
    }

    /// Keyboard reorder.
    pub fn nudge_module(&mut self, id: ModuleId, offset: isize) -> bool {
        let moved = self.stack.nudge(id, offset);
        if moved {
            debug!("Nudged {} by {}", id, offset);
        }
        moved
    }

    pub fn set_param(&mut self, id: ModuleId, param_id: u32, value: f32) -> bool {
        let Some(record) = self.stack.get_mut(id) else {
            return false;
        };
        let Some(info) = record.kind.info().find_param(param_id).cloned() else {
            return false;
        };
        let value = info.clamp(value);
        record.params.insert(param_id, value);
        self.chain.set_param(id, param_id, value);
        true
    }

    // ─────────────────────────────────────────────────────────────────────
    // Drag session
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_drag_start(&mut self, active: Option<ModuleId>) -> bool {
        let started = self.drag.start(active, &self.stack);
        match (started, active) {
            (true, Some(id)) if self.drag.active_module.is_none() => {
                debug!("Drag started on unknown module {}", id);
            }
            (true, Some(id)) => debug!("Drag started: {}", id),
            _ => trace!("Drag start ignored: no active id"),
        }
        started
    }

    pub fn handle_drag_move(&mut self, delta: Translate) {
        self.drag.move_to(delta, &self.modifiers);
    }

    /// Finish the drag, reordering if `active` and `over` are distinct
    /// modules on the stack. The session is always back to idle afterwards.
    pub fn handle_drag_end(&mut self, active: Option<ModuleId>, over: Option<ModuleId>) -> bool {
        self.drag.dragging = false;

        let moved = match (active, over) {
            (Some(active), Some(over)) if active != over => {
                let moved = self.stack.move_by_id(active, over);
                if moved {
                    debug!("Moved {} to position of {}", active, over);
                } else {
                    trace!("Drag end ignored: stale ids {} -> {}", active, over);
                }
                moved
            }
            _ => {
                trace!("Drag end without a distinct target");
                false
            }
        };

        self.drag.end();
        moved
    }

    /// Pointer cancel. Equivalent to a drag-end with no target.
    pub fn handle_drag_cancel(&mut self) {
        let active = self.drag.active_id;
        self.handle_drag_end(active, None);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Audio file
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_current_file(&mut self, file: Option<AudioFile>) {
        if let Some(f) = &file {
            debug!("Current file: {} ({})", f.name, f.mime_type);
        }
        self.file.set_current_file(file);
    }

    pub fn set_file_is_audio(&mut self, is_audio: bool) {
        self.file.set_file_is_audio(is_audio);
    }

    pub fn load_file(&mut self, file: AudioFile) {
        debug!("Loading file: {} ({})", file.name, file.mime_type);
        self.file.load(file);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────

    pub fn apply(&mut self, cmd: Command) -> CommandResult {
        let applied = match cmd {
            Command::RegisterModule { kind } => {
                let id = self.register_module(kind);
                return CommandResult::ModuleRegistered { id };
            }
            Command::UnregisterModule { position } => self.unregister_module(position),
            Command::NudgeModule { id, offset } => self.nudge_module(id, offset),
            Command::DragStart { active } => self.handle_drag_start(active),
            Command::DragMove { delta } => {
                self.handle_drag_move(delta);
                self.drag.dragging
            }
            Command::DragEnd { active, over } => self.handle_drag_end(active, over),
            Command::DragCancel => {
                self.handle_drag_cancel();
                false
            }
            Command::SetParam {
                id,
                param_id,
                value,
            } => self.set_param(id, param_id, value),
            Command::SetCurrentFile { file } => {
                self.set_current_file(file);
                true
            }
            Command::SetFileIsAudio { is_audio } => {
                self.set_file_is_audio(is_audio);
                true
            }
        };

        if applied {
            CommandResult::Ok
        } else {
            CommandResult::Ignored
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────

    /// Snapshot for the UI.
    pub fn view(&self) -> StackView {
        StackView::build(
            &self.stack,
            &self.drag,
            self.file.current_file.is_some(),
            self.file.file_is_audio,
        )
    }

    /// Process one block in place, through the modules in stack order.
    pub fn process(&mut self, buffer: &mut AudioBuffer) {
        let ctx = ProcessContext::new(buffer.frames, self.config.sample_rate);
        let order = self.stack.ids();
        self.chain.process(order, &ctx, buffer);
    }

    /// Render a whole clip through the current stack.
    pub fn render(&mut self, clip: &AudioClip) -> AudioClip {
        let order = self.stack.ids();
        self.chain.render(&order, clip, self.config.max_block_size)
    }

    /// Render the current file, if it is audio and has been decoded.
    pub fn render_current(&mut self) -> Option<AudioClip> {
        if !self.file.file_is_audio {
            return None;
        }
        let clip = self.file.clip()?.clone();
        Some(self.render(&clip))
    }
}

impl Default for StackController {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::params;

    fn controller_with(kinds: &[EffectKind]) -> (StackController, Vec<ModuleId>) {
        let mut controller = StackController::default();
        let ids = kinds.iter().map(|&k| controller.register_module(k)).collect();
        (controller, ids)
    }

    fn abc() -> (StackController, Vec<ModuleId>) {
        controller_with(&[EffectKind::Distortion, EffectKind::Delay, EffectKind::BitCrush])
    }

    fn assert_idle(controller: &StackController) {
        assert!(!controller.drag().dragging);
        assert!(controller.drag().active_id.is_none());
        assert!(controller.drag().is_idle());
    }

    #[test]
    fn test_register_appends_fresh_id() {
        let (mut controller, ids) = controller_with(&[EffectKind::Distortion, EffectKind::Delay]);
        let x = controller.register_module(EffectKind::BitCrush);

        assert_eq!(controller.stack().ids(), vec![ids[0], ids[1], x]);
        assert!(!ids.contains(&x));
        assert_eq!(controller.view().items[2].kind, EffectKind::BitCrush);
    }

    #[test]
    fn test_unregister_middle_reindexes() {
        let (mut controller, ids) = abc();
        let (a, c) = (ids[0], ids[2]);
        assert_eq!(controller.view().index_of(c), Some(2));

        assert!(controller.unregister_module(1));

        let view = controller.view();
        assert_eq!(controller.stack().ids(), vec![a, c]);
        assert_eq!(view.index_of(a), Some(0));
        assert_eq!(view.index_of(c), Some(1));
    }

    #[test]
    fn test_unregister_out_of_range_is_noop() {
        let (mut controller, ids) = abc();
        assert!(!controller.unregister_module(3));
        assert_eq!(controller.stack().ids(), ids);
    }

    #[test]
    fn test_register_then_unregister_last_round_trips() {
        let (mut controller, ids) = abc();
        controller.register_module(EffectKind::Delay);
        let last = controller.stack().len() - 1;
        controller.unregister_module(last);
        assert_eq!(controller.stack().ids(), ids);
    }

    #[test]
    fn test_drag_reorders_with_array_move() {
        let (mut controller, ids) = abc();
        let (a, b, c) = (ids[0], ids[1], ids[2]);

        controller.handle_drag_start(Some(c));
        assert!(controller.view().dragging);

        assert!(controller.handle_drag_end(Some(c), Some(a)));
        assert_eq!(controller.stack().ids(), vec![c, a, b]);
        assert_idle(&controller);
    }

    #[test]
    fn test_drag_end_without_target_is_noop() {
        let (mut controller, ids) = abc();
        controller.handle_drag_start(Some(ids[0]));
        assert!(!controller.handle_drag_end(Some(ids[0]), None));
        assert_eq!(controller.stack().ids(), ids);
        assert_idle(&controller);

        assert!(!controller.handle_drag_end(None, Some(ids[0])));
        assert_idle(&controller);
    }

    #[test]
    fn test_drag_end_same_id_is_noop() {
        let (mut controller, ids) = abc();
        controller.handle_drag_start(Some(ids[1]));
        assert!(!controller.handle_drag_end(Some(ids[1]), Some(ids[1])));
        assert_eq!(controller.stack().ids(), ids);
        assert_idle(&controller);
    }

    #[test]
    fn test_drag_end_with_stale_id_is_noop() {
        let (mut controller, ids) = abc();
        let stranger = ModuleId::random();

        controller.handle_drag_start(Some(stranger));
        assert!(controller.drag().dragging);
        assert!(controller.view().overlay.is_none());

        assert!(!controller.handle_drag_end(Some(stranger), Some(ids[0])));
        assert!(!controller.handle_drag_end(Some(ids[0]), Some(stranger)));
        assert_eq!(controller.stack().ids(), ids);
        assert_idle(&controller);
    }

    #[test]
    fn test_drag_start_without_id_is_ignored() {
        let (mut controller, _) = abc();
        assert!(!controller.handle_drag_start(None));
        assert_idle(&controller);
    }

    #[test]
    fn test_cancel_behaves_like_end_without_target() {
        let (mut controller, ids) = abc();
        controller.handle_drag_start(Some(ids[2]));
        controller.handle_drag_cancel();
        assert_eq!(controller.stack().ids(), ids);
        assert_idle(&controller);
    }

    #[test]
    fn test_view_hides_original_and_shows_overlay() {
        let (mut controller, ids) = abc();
        controller.handle_drag_start(Some(ids[1]));
        controller.handle_drag_move(Translate::new(30.0, 64.0));

        let view = controller.view();
        assert!(view.dragging);

        let dragged = &view.items[1];
        assert_eq!(dragged.opacity, 0.0);
        assert!(dragged.handle.pressed);
        // Vertical axis lock is on by default.
        assert_eq!(dragged.transform.as_deref(), Some("translate3d(0px, 64px, 0)"));

        for item in [&view.items[0], &view.items[2]] {
            assert_eq!(item.opacity, 1.0);
            assert!(item.transform.is_none());
            assert!(!item.handle.pressed);
        }

        let overlay = view.overlay.expect("overlay while dragging");
        assert_eq!(overlay.id, ids[1]);
        assert_eq!(overlay.kind, EffectKind::Delay);
        assert_eq!(overlay.opacity, 0.5);

        controller.handle_drag_end(Some(ids[1]), None);
        let view = controller.view();
        assert!(view.overlay.is_none());
        assert!(view.items.iter().all(|i| i.opacity == 1.0 && i.transform.is_none()));
    }

    #[test]
    fn test_removing_dragged_module_cancels_drag() {
        let (mut controller, ids) = abc();
        controller.handle_drag_start(Some(ids[1]));
        controller.unregister_module(1);
        assert_idle(&controller);

        // Removing some other module leaves the drag alone.
        controller.handle_drag_start(Some(ids[0]));
        controller.unregister_module(1);
        assert!(controller.drag().dragging);
        assert_eq!(controller.drag().active_id, Some(ids[0]));
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut controller = StackController::default();

        let CommandResult::ModuleRegistered { id: a } =
            controller.apply(Command::RegisterModule { kind: EffectKind::Delay })
        else {
            panic!("expected registration");
        };
        let CommandResult::ModuleRegistered { id: b } =
            controller.apply(Command::RegisterModule { kind: EffectKind::BitCrush })
        else {
            panic!("expected registration");
        };

        assert_eq!(controller.apply(Command::DragStart { active: Some(b) }), CommandResult::Ok);
        assert_eq!(
            controller.apply(Command::DragEnd { active: Some(b), over: Some(a) }),
            CommandResult::Ok
        );
        assert_eq!(controller.stack().ids(), vec![b, a]);

        assert_eq!(
            controller.apply(Command::UnregisterModule { position: 7 }),
            CommandResult::Ignored
        );
        assert_eq!(
            controller.apply(Command::NudgeModule { id: b, offset: 1 }),
            CommandResult::Ok
        );
        assert_eq!(controller.stack().ids(), vec![a, b]);
        assert_eq!(controller.apply(Command::DragCancel), CommandResult::Ignored);
    }

    #[test]
    fn test_set_param_clamps_and_records() {
        let (mut controller, ids) = controller_with(&[EffectKind::BitCrush]);
        assert!(controller.set_param(ids[0], params::BITS, 99.0));
        assert_eq!(controller.stack().get(ids[0]).unwrap().params[&params::BITS], 16.0);
        assert!(!controller.set_param(ids[0], 42, 1.0));
        assert!(!controller.set_param(ModuleId::random(), params::BITS, 4.0));
    }

    #[test]
    fn test_render_current_requires_audio() {
        let (mut controller, ids) = controller_with(&[EffectKind::BitCrush]);
        controller.set_param(ids[0], params::BITS, 1.0);
        assert!(controller.render_current().is_none());

        let clip = AudioClip::from_channels(8000, vec![vec![0.8, -0.8, 0.2]]);
        controller.load_file(AudioFile::new("take.wav", "audio/wav").with_clip(clip));
        let out = controller.render_current().expect("rendered");
        assert_eq!(out.samples, vec![1.0, -1.0, 0.0]);

        controller.set_file_is_audio(false);
        assert!(controller.render_current().is_none());
    }

    #[test]
    fn test_render_zero_rate_clip_through_delay() {
        let (mut controller, _) = controller_with(&[EffectKind::Delay]);
        let clip = AudioClip::from_channels(0, vec![vec![0.5, 0.25]]);
        controller.load_file(AudioFile::new("broken.wav", "audio/wav").with_clip(clip));

        let out = controller.render_current().expect("rendered");
        assert_eq!(out.samples, vec![0.5, 0.25]);
    }

    #[test]
    fn test_process_follows_stack_order() {
        let (mut controller, ids) = controller_with(&[EffectKind::BitCrush, EffectKind::Distortion]);
        controller.set_param(ids[0], params::BITS, 1.0);
        controller.set_param(ids[1], params::AMOUNT, 0.0);
        controller.set_param(ids[1], params::LEVEL, -24.0);

        let mut data = vec![0.8; 4];
        let mut buffer = AudioBuffer::new(&mut data, 1);
        controller.process(&mut buffer);
        assert!(data.iter().all(|&s| s > 0.06));

        controller.handle_drag_start(Some(ids[1]));
        controller.handle_drag_end(Some(ids[1]), Some(ids[0]));

        let mut data = vec![0.8; 4];
        let mut buffer = AudioBuffer::new(&mut data, 1);
        controller.process(&mut buffer);
        assert!(data.iter().all(|&s| s == 0.0));
    }
}
