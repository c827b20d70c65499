//! Immediate-mode draw list that scenes fill every frame.
//!
//! Levels describe their frame as a flat list of [`DrawCmd`]s in arena
//! coordinates (top-left origin, y down).  The render systems then map the
//! list onto pooled Bevy entities:
//!
//! | Command kind            | Rendered as                                    |
//! |-------------------------|------------------------------------------------|
//! | filled rect / ellipse   | `Mesh2d` unit quad / unit circle, scaled       |
//! | filled polygon          | `Mesh2d` triangle fan, cached by shape         |
//! | outlines and lines      | 2D gizmos                                      |
//! | text                    | absolutely positioned UI `Text` nodes          |
//!
//! ## Systems (registered by `CanvasPlugin`)
//!
//! | System                 | Set                  | Purpose                              |
//! |------------------------|----------------------|--------------------------------------|
//! | `clear_canvas`         | `CanvasSet::Clear`   | Drop last frame's commands           |
//! | scene draw systems     | `CanvasSet::Draw`    | Push this frame's commands           |
//! | `render_canvas_shapes` | `CanvasSet::Render`  | Sync pooled mesh entities            |
//! | `render_canvas_lines`  | `CanvasSet::Render`  | Emit gizmo lines                     |
//! | `render_canvas_text`   | `CanvasSet::Render`  | Sync pooled UI text nodes            |
//!
//! Pool entities are never despawned; the ones a frame does not use are
//! hidden.  Later commands are drawn on top of earlier ones.

use crate::config::GameConfig;
use crate::graphics::{FontMetrics, GameFont};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use std::collections::HashMap;

/// UI layer of canvas text: above the world, below every overlay.
pub const CANVAS_TEXT_Z: i32 = 10;

/// Segments used for gizmo ellipse outlines.
const OUTLINE_SEGMENTS: usize = 40;

/// Polygon mesh cache is dropped once it holds this many entries.
const POLYGON_CACHE_LIMIT: usize = 256;

// ── Draw list ─────────────────────────────────────────────────────────────────

/// Horizontal anchoring of a text command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One primitive in arena coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect {
        rect: Rect,
        color: Color,
        filled: bool,
    },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        color: Color,
        filled: bool,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
    },
    /// Convex polygon.
    Polygon {
        points: Vec<Vec2>,
        color: Color,
        filled: bool,
    },
    Text {
        text: String,
        pos: Vec2,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// Top-left corner of an `arena`-sized playfield centred in `window`.
pub fn arena_origin(window: Vec2, arena: Vec2) -> Vec2 {
    ((window - arena) * 0.5).max(Vec2::ZERO)
}

/// The frame being built.
#[derive(Resource, Debug, Clone)]
pub struct Canvas {
    commands: Vec<DrawCmd>,
    origin: Vec2,
    window: Vec2,
}

impl FromWorld for Canvas {
    fn from_world(world: &mut World) -> Self {
        let window = world
            .get_resource::<GameConfig>()
            .map(GameConfig::window_size)
            .unwrap_or_else(|| GameConfig::default().window_size());
        Canvas::new(window)
    }
}

impl Canvas {
    pub fn new(window: Vec2) -> Self {
        Self {
            commands: Vec::new(),
            origin: Vec2::ZERO,
            window,
        }
    }

    /// Drop every command and reset the arena to the full window.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.origin = Vec2::ZERO;
    }

    /// Centre an `arena`-sized playfield in the window for later commands.
    pub fn set_arena(&mut self, arena: Vec2) {
        self.origin = arena_origin(self.window, arena);
    }

    pub fn commands(&self) -> &[DrawCmd] {
        &self.commands
    }

    pub fn window(&self) -> Vec2 {
        self.window
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Arena point to Bevy world space (camera at the window centre, y up).
    pub fn to_world(&self, p: Vec2) -> Vec2 {
        let w = p + self.origin;
        Vec2::new(w.x - self.window.x * 0.5, self.window.y * 0.5 - w.y)
    }

    // ── Primitives ───────────────────────────────────────────────────────────

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCmd::Rect {
            rect: Rect::new(x, y, x + w, y + h),
            color,
            filled: true,
        });
    }

    pub fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        self.commands.push(DrawCmd::Rect {
            rect: Rect::new(x, y, x + w, y + h),
            color,
            filled: false,
        });
    }

    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.fill_ellipse(center, Vec2::splat(radius), color);
    }

    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::Ellipse {
            center,
            radii: Vec2::splat(radius),
            color,
            filled: false,
        });
    }

    pub fn fill_ellipse(&mut self, center: Vec2, radii: Vec2, color: Color) {
        self.commands.push(DrawCmd::Ellipse {
            center,
            radii,
            color,
            filled: true,
        });
    }

    pub fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.commands.push(DrawCmd::Line { from, to, color });
    }

    pub fn fill_polygon(&mut self, points: Vec<Vec2>, color: Color) {
        if points.len() >= 3 {
            self.commands.push(DrawCmd::Polygon {
                points,
                color,
                filled: true,
            });
        }
    }

    pub fn stroke_polygon(&mut self, points: Vec<Vec2>, color: Color) {
        if points.len() >= 2 {
            self.commands.push(DrawCmd::Polygon {
                points,
                color,
                filled: false,
            });
        }
    }

    /// Text with its top-left corner at `pos`.
    pub fn text(&mut self, text: impl Into<String>, pos: Vec2, size: f32, color: Color) {
        self.commands.push(DrawCmd::Text {
            text: text.into(),
            pos,
            size,
            color,
            align: TextAlign::Left,
        });
    }

    /// Text horizontally centred on `center_x`, top edge at `y`.
    pub fn text_centered(
        &mut self,
        text: impl Into<String>,
        center_x: f32,
        y: f32,
        size: f32,
        color: Color,
    ) {
        self.commands.push(DrawCmd::Text {
            text: text.into(),
            pos: Vec2::new(center_x, y),
            size,
            color,
            align: TextAlign::Center,
        });
    }
}

// ── Meshes ────────────────────────────────────────────────────────────────────

/// Triangle-fan mesh over a convex outline given in world space.
pub fn polygon_mesh(points: &[Vec2]) -> Mesh {
    let centroid = points.iter().copied().sum::<Vec2>() / points.len().max(1) as f32;
    let n = points.len();

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n + 1);
    positions.push([centroid.x, centroid.y, 0.0]);
    positions.extend(points.iter().map(|p| [p.x, p.y, 0.0]));
    let normals = vec![[0.0, 0.0, 1.0]; n + 1];
    let uvs = vec![[0.5, 0.5]; n + 1];

    let mut indices: Vec<u32> = Vec::with_capacity(n * 3);
    for i in 0..n as u32 {
        let v1 = i + 1;
        let v2 = (i + 1) % n as u32 + 1;
        indices.extend_from_slice(&[0, v1, v2]);
    }

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Points on an ellipse outline, first point repeated at the end.
fn ellipse_outline(center: Vec2, radii: Vec2) -> Vec<Vec2> {
    (0..=OUTLINE_SEGMENTS)
        .map(|i| {
            let a = std::f32::consts::TAU * i as f32 / OUTLINE_SEGMENTS as f32;
            center + Vec2::new(a.cos() * radii.x, a.sin() * radii.y)
        })
        .collect()
}

/// Shared unit meshes plus the filled-polygon cache.
#[derive(Resource)]
pub struct CanvasMeshes {
    quad: Handle<Mesh>,
    circle: Handle<Mesh>,
    polygons: HashMap<Vec<[i32; 2]>, Handle<Mesh>>,
}

impl FromWorld for CanvasMeshes {
    fn from_world(world: &mut World) -> Self {
        let mut meshes = world.resource_mut::<Assets<Mesh>>();
        let quad = meshes.add(polygon_mesh(&[
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.5, 0.5),
            Vec2::new(-0.5, 0.5),
        ]));
        let circle = meshes.add(polygon_mesh(
            &ellipse_outline(Vec2::ZERO, Vec2::splat(0.5))[..OUTLINE_SEGMENTS],
        ));
        Self {
            quad,
            circle,
            polygons: HashMap::new(),
        }
    }
}

/// Cache key of a polygon: its vertices relative to the first one, in
/// quarter pixels.  Returns the anchor the mesh is translated to.
pub fn polygon_key(world_points: &[Vec2]) -> (Vec2, Vec<[i32; 2]>) {
    let anchor = world_points.first().copied().unwrap_or(Vec2::ZERO);
    let key = world_points
        .iter()
        .map(|p| {
            let local = (*p - anchor) * 4.0;
            [local.x.round() as i32, local.y.round() as i32]
        })
        .collect();
    (anchor, key)
}

impl CanvasMeshes {
    /// Mesh in anchor-local space plus the anchor to place it at.
    fn polygon(
        &mut self,
        world_points: &[Vec2],
        meshes: &mut Assets<Mesh>,
    ) -> (Handle<Mesh>, Vec2) {
        let (anchor, key) = polygon_key(world_points);
        if let Some(handle) = self.polygons.get(&key) {
            return (handle.clone(), anchor);
        }
        if self.polygons.len() >= POLYGON_CACHE_LIMIT {
            self.polygons.clear();
        }
        let local: Vec<Vec2> = world_points.iter().map(|p| *p - anchor).collect();
        let handle = meshes.add(polygon_mesh(&local));
        self.polygons.insert(key, handle.clone());
        (handle, anchor)
    }
}

// ── Pools ─────────────────────────────────────────────────────────────────────

/// Pooled filled-shape entity.
#[derive(Component)]
pub struct CanvasShape;

/// Pooled text entity.
#[derive(Component)]
pub struct CanvasLabel;

#[derive(Resource, Default)]
pub struct ShapePool(Vec<(Entity, Handle<ColorMaterial>)>);

#[derive(Resource, Default)]
pub struct LabelPool(Vec<Entity>);

// ── Plugin ────────────────────────────────────────────────────────────────────

/// Ordering of canvas work inside `Update`.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum CanvasSet {
    Clear,
    Draw,
    Render,
}

pub struct CanvasPlugin;

impl Plugin for CanvasPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Canvas>()
            .init_resource::<ShapePool>()
            .init_resource::<LabelPool>()
            .configure_sets(
                Update,
                (CanvasSet::Clear, CanvasSet::Draw, CanvasSet::Render).chain(),
            )
            .add_systems(Update, clear_canvas.in_set(CanvasSet::Clear))
            .add_systems(
                Update,
                (render_canvas_shapes, render_canvas_lines, render_canvas_text)
                    .in_set(CanvasSet::Render),
            );
    }

    fn finish(&self, app: &mut App) {
        app.init_resource::<CanvasMeshes>();
    }
}

pub fn clear_canvas(mut canvas: ResMut<Canvas>) {
    canvas.clear();
}

/// Map filled rects, ellipses and polygons onto pooled `Mesh2d` entities.
pub fn render_canvas_shapes(
    mut commands: Commands,
    canvas: Res<Canvas>,
    mut pool: ResMut<ShapePool>,
    mut canvas_meshes: ResMut<CanvasMeshes>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut shapes: Query<(&mut Mesh2d, &mut Transform, &mut Visibility), With<CanvasShape>>,
) {
    let mut used = 0;
    for (order, cmd) in canvas.commands().iter().enumerate() {
        let (mesh, translation, scale, color) = match cmd {
            DrawCmd::Rect {
                rect,
                color,
                filled: true,
            } => (
                canvas_meshes.quad.clone(),
                canvas.to_world(rect.center()),
                rect.size(),
                *color,
            ),
            DrawCmd::Ellipse {
                center,
                radii,
                color,
                filled: true,
            } => (
                canvas_meshes.circle.clone(),
                canvas.to_world(*center),
                *radii * 2.0,
                *color,
            ),
            DrawCmd::Polygon {
                points,
                color,
                filled: true,
            } => {
                let world: Vec<Vec2> = points.iter().map(|p| canvas.to_world(*p)).collect();
                let (mesh, anchor) = canvas_meshes.polygon(&world, &mut meshes);
                (mesh, anchor, Vec2::ONE, *color)
            }
            _ => continue,
        };
        let transform = Transform {
            translation: translation.extend(order as f32 * 0.01),
            scale: scale.extend(1.0),
            ..default()
        };

        let Some((entity, material)) = pool.0.get(used).cloned() else {
            let material = materials.add(ColorMaterial::from_color(color));
            let entity = commands
                .spawn((
                    CanvasShape,
                    Mesh2d(mesh),
                    MeshMaterial2d(material.clone()),
                    transform,
                    Visibility::Visible,
                ))
                .id();
            pool.0.push((entity, material));
            used += 1;
            continue;
        };
        used += 1;

        if let Ok((mut mesh2d, mut current, mut visibility)) = shapes.get_mut(entity) {
            if mesh2d.0 != mesh {
                mesh2d.0 = mesh;
            }
            if *current != transform {
                *current = transform;
            }
            if *visibility != Visibility::Visible {
                *visibility = Visibility::Visible;
            }
        }
        if materials.get(&material).is_some_and(|m| m.color != color) {
            if let Some(m) = materials.get_mut(&material) {
                m.color = color;
            }
        }
    }

    for (entity, _) in pool.0.iter().skip(used) {
        if let Ok((_, _, mut visibility)) = shapes.get_mut(*entity) {
            if *visibility != Visibility::Hidden {
                *visibility = Visibility::Hidden;
            }
        }
    }
}

/// Outlines and lines go through gizmos; they are redrawn every frame anyway.
pub fn render_canvas_lines(canvas: Res<Canvas>, mut gizmos: Gizmos) {
    for cmd in canvas.commands() {
        match cmd {
            DrawCmd::Line { from, to, color } => {
                gizmos.line_2d(canvas.to_world(*from), canvas.to_world(*to), *color);
            }
            DrawCmd::Rect {
                rect,
                color,
                filled: false,
            } => {
                let corners = [
                    rect.min,
                    Vec2::new(rect.max.x, rect.min.y),
                    rect.max,
                    Vec2::new(rect.min.x, rect.max.y),
                    rect.min,
                ];
                gizmos.linestrip_2d(corners.map(|p| canvas.to_world(p)), *color);
            }
            DrawCmd::Ellipse {
                center,
                radii,
                color,
                filled: false,
            } => {
                let outline = ellipse_outline(*center, *radii);
                gizmos.linestrip_2d(outline.into_iter().map(|p| canvas.to_world(p)), *color);
            }
            DrawCmd::Polygon {
                points,
                color,
                filled: false,
            } => {
                let closed = points.iter().chain(points.first()).map(|p| canvas.to_world(*p));
                gizmos.linestrip_2d(closed, *color);
            }
            _ => {}
        }
    }
}

/// Map text commands onto pooled UI text nodes.
pub fn render_canvas_text(
    mut commands: Commands,
    canvas: Res<Canvas>,
    font: Res<GameFont>,
    metrics: Res<FontMetrics>,
    mut pool: ResMut<LabelPool>,
    mut labels: Query<
        (
            &mut Text,
            &mut TextFont,
            &mut TextColor,
            &mut Node,
            &mut Visibility,
        ),
        With<CanvasLabel>,
    >,
) {
    let mut used = 0;
    for cmd in canvas.commands() {
        let DrawCmd::Text {
            text,
            pos,
            size,
            color,
            align,
        } = cmd
        else {
            continue;
        };
        let mut at = *pos + canvas.origin();
        if *align == TextAlign::Center {
            at.x -= metrics.measure().width(text, *size) * 0.5;
        }

        let Some(entity) = pool.0.get(used).copied() else {
            let entity = commands
                .spawn((
                    CanvasLabel,
                    Text::new(text.clone()),
                    TextFont {
                        font: font.0.clone(),
                        font_size: *size,
                        ..default()
                    },
                    TextColor(*color),
                    TextLayout::new_with_linebreak(LineBreak::NoWrap),
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(at.x),
                        top: Val::Px(at.y),
                        ..default()
                    },
                    ZIndex(CANVAS_TEXT_Z),
                    Visibility::Visible,
                ))
                .id();
            pool.0.push(entity);
            used += 1;
            continue;
        };
        used += 1;

        if let Ok((mut label, mut text_font, mut text_color, mut node, mut visibility)) =
            labels.get_mut(entity)
        {
            if label.0 != *text {
                label.0 = text.clone();
            }
            if text_font.font_size != *size {
                text_font.font_size = *size;
            }
            if text_color.0 != *color {
                text_color.0 = *color;
            }
            if node.left != Val::Px(at.x) || node.top != Val::Px(at.y) {
                node.left = Val::Px(at.x);
                node.top = Val::Px(at.y);
            }
            if *visibility != Visibility::Visible {
                *visibility = Visibility::Visible;
            }
        }
    }

    for entity in pool.0.iter().skip(used) {
        if let Ok((_, _, _, _, mut visibility)) = labels.get_mut(*entity) {
            if *visibility != Visibility::Hidden {
                *visibility = Visibility::Hidden;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_arena_is_centred() {
        let mut canvas = Canvas::new(Vec2::new(1200.0, 800.0));
        canvas.set_arena(Vec2::new(800.0, 600.0));
        assert_eq!(canvas.origin(), Vec2::new(200.0, 100.0));
        // Arena centre lands on the world origin
        assert_eq!(canvas.to_world(Vec2::new(400.0, 300.0)), Vec2::ZERO);
        // Arena top-left is up and to the left
        assert_eq!(
            canvas.to_world(Vec2::ZERO),
            Vec2::new(-400.0, 300.0)
        );
    }

    #[test]
    fn clear_resets_commands_and_origin() {
        let mut canvas = Canvas::new(Vec2::new(1200.0, 800.0));
        canvas.set_arena(Vec2::new(800.0, 600.0));
        canvas.fill_rect(0.0, 0.0, 10.0, 10.0, Color::WHITE);
        canvas.text("score", Vec2::ZERO, 20.0, Color::WHITE);
        assert_eq!(canvas.commands().len(), 2);
        canvas.clear();
        assert!(canvas.commands().is_empty());
        assert_eq!(canvas.origin(), Vec2::ZERO);
    }

    #[test]
    fn moved_polygons_share_a_cache_key() {
        let wing = [Vec2::new(10.0, 10.0), Vec2::new(40.0, 10.0), Vec2::new(25.0, 30.0)];
        let moved: Vec<Vec2> = wing.iter().map(|p| *p + Vec2::new(123.5, -7.25)).collect();

        let (anchor, key) = polygon_key(&wing);
        let (moved_anchor, moved_key) = polygon_key(&moved);
        assert_eq!(key, moved_key);
        assert_eq!(anchor, Vec2::new(10.0, 10.0));
        assert_eq!(moved_anchor, Vec2::new(133.5, 2.75));
        assert_eq!(key[0], [0, 0]);
    }

    #[test]
    fn degenerate_polygons_are_dropped() {
        let mut canvas = Canvas::new(Vec2::new(100.0, 100.0));
        canvas.fill_polygon(vec![Vec2::ZERO, Vec2::X], Color::WHITE);
        canvas.stroke_polygon(vec![Vec2::ZERO], Color::WHITE);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn fan_mesh_has_one_triangle_per_edge() {
        let mesh = polygon_mesh(&[Vec2::ZERO, Vec2::X, Vec2::ONE]);
        assert_eq!(mesh.count_vertices(), 4);
        assert_eq!(mesh.indices().map(|i| i.len()), Some(9));
    }

    #[test]
    fn oversized_arena_is_pinned_to_the_corner() {
        assert_eq!(
            arena_origin(Vec2::new(800.0, 600.0), Vec2::new(1200.0, 800.0)),
            Vec2::ZERO
        );
    }
}
