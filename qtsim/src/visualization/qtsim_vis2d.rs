use bevy::log::LogPlugin;
use bevy::math::primitives::Circle;
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};

use crate::simulation::scenario::Scenario;
use crate::simulation::states::{NVec2, Rect};

#[derive(Component)]
struct BodyIndex(pub usize);

const SCALE: f32 = 1.0; // world units -> pixels
const BACKGROUND: Color = Color::srgb(40.0 / 255.0, 40.0 / 255.0, 40.0 / 255.0);

pub fn run_2d(scenario: Scenario) {
    tracing::info!(bodies = scenario.space.len(), "starting Bevy 2D viewer");

    let bounds = *scenario.space.bounds();

    App::new()
        .insert_resource(scenario)
        .insert_resource(ClearColor(BACKGROUND))
        // tracing is already set up by the binary
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "qtsim".into(),
                resolution: ((bounds.width() as f32) * SCALE, (bounds.height() as f32) * SCALE).into(),
                ..Default::default()
            }),
            ..Default::default()
        }).disable::<LogPlugin>())
        .add_systems(Startup, setup_bodies_system)
        .add_systems(Update, (physics_step_system, sync_transforms_system).chain())
        .run();
}

fn setup_bodies_system(mut commands: Commands, scenario: Res<Scenario>, mut meshes: ResMut<Assets<Mesh>>, mut materials: ResMut<Assets<ColorMaterial>>) {
    // 2D camera
    commands.spawn(Camera2dBundle::default());

    let space = &scenario.space;
    for h in space.handles() {
        let radius_screen = space.radius(h) as f32 * SCALE;
        let p = to_screen(space.bounds(), &space.position(h));
        let [r, g, b] = space.color(h);

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(radius_screen))),
                material: materials.add(ColorMaterial::from(Color::srgb_u8(r, g, b))),
                transform: Transform::from_xyz(p.x, p.y, 0.0),
                ..Default::default()
            },
            BodyIndex(h.0),
        ));
    }
}

fn physics_step_system(mut scenario: ResMut<Scenario>) {
    let dt = scenario.parameters.h0;
    scenario.space.advance(dt);
}

fn sync_transforms_system(scenario: Res<Scenario>, mut query: Query<(&BodyIndex, &mut Transform)>) {
    let space = &scenario.space;
    for (BodyIndex(i), mut transform) in &mut query {
        if let Some(b) = space.bodies().get(*i) {
            let p = to_screen(space.bounds(), &b.x);
            transform.translation.x = p.x;
            transform.translation.y = p.y;
        }
    }
}

/// Simulation space has y pointing down from the top-left corner; the Bevy
/// camera is centered with y pointing up.
fn to_screen(bounds: &Rect, p: &NVec2) -> Vec2 {
    let c = bounds.center();
    Vec2::new(((p.x - c.x) as f32) * SCALE, ((c.y - p.y) as f32) * SCALE)
}
