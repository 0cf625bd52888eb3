use crate::camera::EditorCamera;
use crate::config::EditorConfig;
use crate::mode::{CursorMode, EditorMode};
use crate::picking::{PickOptions, pick};
use glam::Vec2;
use lain_assets::{AssetError, ModelCatalog};
use lain_common::{EntityId, EntityInfo, ModelType, Ray, Transform};
use lain_ecs::EntityRegistry;
use lain_geom::{Viewport, cursor_ray};
use lain_input::{Action, InputState, Key, MouseButton};
use lain_persist::{LevelData, LevelError, LevelFormat, LevelStore};
use lain_render::{Frame, LineSet, Overlay, RenderView, grid_lines};
use lain_tools::LevelInspector;
use std::path::PathBuf;

/// Errors from editor operations. The scene is unchanged whenever one is
/// returned.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    Level(#[from] LevelError),
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("missing entity {0}")]
    UnknownEntity(EntityId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Last user-visible outcome, shown in the edit-mode panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }
}

impl std::fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            StatusKind::Info => f.write_str(&self.text),
            StatusKind::Error => write!(f, "error: {}", self.text),
        }
    }
}

/// One editing session over one scene.
///
/// Owns the registries, the model catalog and the level store. A frame is
/// `process_input`, any number of `apply` calls for UI actions, `update`,
/// then `render`.
pub struct LevelEditor {
    registry: EntityRegistry,
    catalog: ModelCatalog,
    store: LevelStore,
    camera: EditorCamera,
    mode: EditorMode,
    selected: Option<EntityId>,
    debug_draw: bool,
    pick_options: PickOptions,
    save_format: LevelFormat,
    viewport: Viewport,
    cursor: Vec2,
    cursor_ray: Option<Ray>,
    status: Option<StatusMessage>,
    grid: LineSet,
}

impl LevelEditor {
    pub fn new(config: EditorConfig, catalog: ModelCatalog) -> Self {
        let viewport = Viewport::from(config.viewport);
        Self {
            registry: EntityRegistry::new(),
            catalog,
            store: LevelStore::new(config.levels_dir.clone()),
            camera: EditorCamera::from_config(&config.camera),
            mode: EditorMode::default(),
            selected: None,
            debug_draw: false,
            pick_options: config.picking,
            save_format: config.save_format,
            viewport,
            cursor: viewport.center(),
            cursor_ray: None,
            status: None,
            grid: grid_lines(config.grid.square_size, config.grid.half_extent),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn cursor_mode(&self) -> CursorMode {
        self.mode.cursor_mode()
    }

    pub fn selected(&self) -> Option<EntityId> {
        self.selected
    }

    pub fn selected_info(&self) -> Option<EntityInfo> {
        self.selected
            .and_then(|id| LevelInspector::inspect_entity(&self.registry, id))
    }

    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    pub fn catalog(&self) -> &ModelCatalog {
        &self.catalog
    }

    pub fn store(&self) -> &LevelStore {
        &self.store
    }

    pub fn camera(&self) -> &EditorCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut EditorCamera {
        &mut self.camera
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn debug_draw(&self) -> bool {
        self.debug_draw
    }

    pub fn pick_options(&self) -> PickOptions {
        self.pick_options
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Ray through the cursor as of the last refresh, `None` if the view was
    /// degenerate.
    pub fn cursor_ray(&self) -> Option<Ray> {
        self.cursor_ray
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        if !viewport.is_valid() {
            tracing::warn!(?viewport, "ignoring empty viewport");
            return;
        }
        self.viewport = viewport;
    }

    /// Mode keys, debug toggle, then the current mode's controls.
    pub fn process_input(&mut self, input: &InputState) {
        if input.key_pressed(Key::F1) {
            self.switch_mode(EditorMode::Edit);
        } else if input.key_pressed(Key::F2) {
            self.switch_mode(EditorMode::Move);
        }
        if input.key_pressed(Key::B) {
            self.toggle_debug_draw();
        }

        match self.mode {
            EditorMode::Move => {
                self.camera.process_keyboard(input);
                if input.cursor_moved() {
                    self.camera.process_cursor(input.cursor_delta());
                }
            }
            EditorMode::Edit => {
                self.cursor = input.cursor_position();
                if input.button_pressed(MouseButton::Left) && !input.pointer_over_ui() {
                    self.pick_at(self.cursor);
                }
                if input.key_pressed(Key::Delete) {
                    self.remove_selected();
                } else if input.key_pressed(Key::Escape) {
                    self.selected = None;
                }
            }
        }
    }

    /// Apply a UI action. Failures are also recorded as the status message.
    pub fn apply(&mut self, action: Action) -> Result<(), EditorError> {
        match action {
            Action::AddEntity(model) => self.add_entity(model).map(|_| ()),
            Action::RemoveSelected => {
                self.remove_selected();
                Ok(())
            }
            Action::RemoveAll => {
                self.remove_all();
                Ok(())
            }
            Action::SetSelectedTransform(transform) => {
                self.set_selected_transform(transform);
                Ok(())
            }
            Action::Select(id) => self.select(id),
            Action::Deselect => {
                self.selected = None;
                Ok(())
            }
            Action::SaveLevel(name) => self.save_level(&name).map(|_| ()),
            Action::LoadLevel(name) => self.load_level(&name).map(|_| ()),
            Action::ToggleDebugDraw => {
                self.toggle_debug_draw();
                Ok(())
            }
            Action::SwitchMode(request) => {
                self.switch_mode(request.into());
                Ok(())
            }
            Action::Noop => Ok(()),
        }
    }

    /// Advance one frame. Move mode eases the camera; edit mode keeps the
    /// cursor ray current for the panel and the next click.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.mode {
            EditorMode::Move => {
                self.camera.set_target(dt);
                self.camera.update();
            }
            EditorMode::Edit => self.refresh_cursor_ray(),
        }
        self.registry.update();
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(self.viewport.aspect()),
            camera_position: self.camera.position,
        }
    }

    /// Scene drawing is the same in both modes; only the overlay differs.
    pub fn render(&self) -> Frame {
        let overlay = match self.mode {
            EditorMode::Move => Overlay::Move {
                camera_position: self.camera.position,
            },
            EditorMode::Edit => Overlay::Edit {
                entity_count: self.registry.len(),
                selected: self.selected_info(),
                status: self.status.as_ref().map(ToString::to_string),
            },
        };
        Frame::extract(
            &self.registry,
            self.render_view(),
            self.debug_draw,
            overlay,
            self.grid.clone(),
        )
    }

    /// Enter `mode`. Switching to the current mode does nothing.
    pub fn switch_mode(&mut self, mode: EditorMode) {
        if self.mode == mode {
            return;
        }
        self.mode = mode;
        tracing::info!(%mode, cursor = ?mode.cursor_mode(), "editor mode switched");
    }

    pub fn toggle_debug_draw(&mut self) -> bool {
        self.debug_draw = !self.debug_draw;
        tracing::debug!(enabled = self.debug_draw, "debug AABB drawing toggled");
        self.debug_draw
    }

    /// Create an entity of `model` at the origin with one collision box per
    /// sub-mesh, and select it.
    pub fn add_entity(&mut self, model: ModelType) -> Result<EntityId, EditorError> {
        let data = match self.catalog.model(model) {
            Ok(data) => data,
            Err(e) => return Err(self.fail("add entity", e.into())),
        };
        let id = self.registry.add_entity(Transform::default());
        self.registry.set_render(id, data.render_component());
        for bounds in data.bounds() {
            self.registry.add_aabb(id, bounds);
        }
        self.selected = Some(id);
        tracing::debug!(%id, %model, shapes = data.meshes.len(), "entity added to level");
        self.status = Some(StatusMessage::info(format!("added {model} {id}")));
        Ok(id)
    }

    /// Remove the selected entity from every registry and clear the
    /// selection.
    pub fn remove_selected(&mut self) -> Option<EntityId> {
        let id = self.selected.take()?;
        if !self.registry.contains(id) {
            return None;
        }
        self.registry.remove_entity(id);
        self.status = Some(StatusMessage::info(format!("removed {id}")));
        Some(id)
    }

    pub fn remove_all(&mut self) -> usize {
        self.selected = None;
        let count = self.registry.remove_all();
        self.status = Some(StatusMessage::info(format!("removed {count} entities")));
        count
    }

    /// Replace the selected entity's transform. Ignored with no selection or
    /// a non-finite transform.
    pub fn set_selected_transform(&mut self, transform: Transform) -> bool {
        let Some(id) = self.selected.filter(|id| self.registry.contains(*id)) else {
            return false;
        };
        if !transform.is_finite() {
            tracing::warn!(%id, "rejecting non-finite transform");
            return false;
        }
        self.registry.set_transform(id, transform);
        true
    }

    pub fn select(&mut self, id: EntityId) -> Result<(), EditorError> {
        if !self.registry.contains(id) {
            return Err(self.fail("select", EditorError::UnknownEntity(id)));
        }
        self.selected = Some(id);
        Ok(())
    }

    /// Cast a ray through `cursor` and select what it hits. A miss clears the
    /// selection.
    pub fn pick_at(&mut self, cursor: Vec2) -> Option<EntityId> {
        self.cursor = cursor;
        self.refresh_cursor_ray();
        self.selected = self
            .cursor_ray
            .and_then(|ray| pick(&self.registry, &ray, &self.pick_options, self.selected));
        self.selected
    }

    /// Write the scene to `<levels_dir>/<name>.level` in the configured
    /// format.
    pub fn save_level(&mut self, name: &str) -> Result<PathBuf, EditorError> {
        let level = LevelData::capture(&self.registry);
        match self.store.save(name, &level, self.save_format) {
            Ok(path) => {
                self.status = Some(StatusMessage::info(format!(
                    "saved level {name} ({} entities)",
                    level.len()
                )));
                Ok(path)
            }
            Err(e) => Err(self.fail("save level", e.into())),
        }
    }

    /// Replace the scene with a stored level. The file is decoded and checked
    /// against the catalog before the current scene is cleared.
    pub fn load_level(&mut self, name: &str) -> Result<usize, EditorError> {
        let prepared = match self
            .store
            .load(name)
            .and_then(|level| level.prepare(&self.catalog))
        {
            Ok(prepared) => prepared,
            Err(e) => return Err(self.fail("load level", e.into())),
        };
        self.selected = None;
        self.registry.remove_all();
        let count = prepared.insert_into(&mut self.registry).len();
        self.status = Some(StatusMessage::info(format!("loaded level {name} ({count} entities)")));
        Ok(count)
    }

    fn refresh_cursor_ray(&mut self) {
        let view = self.camera.view_matrix();
        let projection = self.camera.projection_matrix(self.viewport.aspect());
        self.cursor_ray = cursor_ray(self.cursor, self.viewport, &view, &projection, self.camera.position);
    }

    fn fail(&mut self, what: &str, error: EditorError) -> EditorError {
        tracing::error!(%error, "{what} failed");
        self.status = Some(StatusMessage::error(format!("{what} failed: {error}")));
        error
    }
}
