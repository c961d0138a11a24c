//! Interactive sandbox: click to drop bodies onto a platform.
//!
//! Left click spawns a box, right click spawns a circle, Escape quits.
//! Bodies that fall out of view are removed from the world.

use ggez::event::{self, EventHandler, MouseButton};
use ggez::glam::Vec2 as GVec2;
use ggez::graphics::{self, Color, DrawMode, DrawParam, Mesh};
use ggez::input::keyboard::{KeyCode, KeyInput};
use ggez::{Context, GameResult};
use rand::Rng;
use tracing::warn;

use planar_physics::{PhysicsWorld, RigidBody, Shape, Vec2};

const WINDOW_WIDTH: f32 = 800.0;
const WINDOW_HEIGHT: f32 = 600.0;
/// Pixels per world unit. The simulation runs in world units; only drawing
/// and mouse input convert.
const SCALE: f64 = 10.0;
// Screen y grows downward, so gravity points along +y here.
const GRAVITY: Vec2 = Vec2 { x: 0.0, y: 9.81 };

/// Presentation-only state for one body: the entity at index `i` decorates
/// the world's body at index `i`, and both lists shrink together on removal.
struct Entity {
    color: Color,
}

impl Entity {
    fn random() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            color: Color::new(
                rng.gen_range(0.3..1.0),
                rng.gen_range(0.3..1.0),
                rng.gen_range(0.3..1.0),
                1.0,
            ),
        }
    }
}

struct MainState {
    world: PhysicsWorld,
    entities: Vec<Entity>,
}

impl MainState {
    fn new() -> GameResult<MainState> {
        let mut world = PhysicsWorld::new();
        world.gravity = GRAVITY;
        let mut entities = Vec::new();

        // Ground platform.
        let ground = RigidBody::new_box(60.0, 4.0, 1.0, true, 0.3)
            .map_err(|e| ggez::GameError::CustomError(e.to_string()))?;
        let idx = world.add_body(ground);
        world.body_mut(idx).unwrap().move_to(Vec2::new(40.0, 55.0));
        entities.push(Entity {
            color: Color::new(0.3, 0.6, 0.3, 1.0),
        });

        // Two angled ledges to roll bodies off.
        for (x, y, tilt) in [(22.0, 25.0, 0.25), (58.0, 35.0, -0.25)] {
            let ledge = RigidBody::new_box(25.0, 2.0, 1.0, true, 0.3)
                .map_err(|e| ggez::GameError::CustomError(e.to_string()))?;
            let idx = world.add_body(ledge);
            let body = world.body_mut(idx).unwrap();
            body.move_to(Vec2::new(x, y));
            body.rotate_to(tilt);
            entities.push(Entity {
                color: Color::new(0.4, 0.4, 0.5, 1.0),
            });
        }

        Ok(MainState { world, entities })
    }

    fn spawn_box(&mut self, position: Vec2) {
        let mut rng = rand::thread_rng();
        let width = rng.gen_range(2.0..5.0);
        let height = rng.gen_range(2.0..5.0);

        match RigidBody::new_box(width, height, 2.0, false, 0.4) {
            Ok(body) => {
                let idx = self.world.add_body(body);
                self.world.body_mut(idx).unwrap().move_to(position);
                self.entities.push(Entity::random());
            }
            Err(e) => warn!(error = %e, "box rejected"),
        }
    }

    fn spawn_circle(&mut self, position: Vec2) {
        let mut rng = rand::thread_rng();
        let radius = rng.gen_range(1.0..2.5);

        match RigidBody::new_circle(radius, 2.0, false, 0.4) {
            Ok(body) => {
                let idx = self.world.add_body(body);
                self.world.body_mut(idx).unwrap().move_to(position);
                self.entities.push(Entity::random());
            }
            Err(e) => warn!(error = %e, "circle rejected"),
        }
    }

    /// Drops bodies that have fallen well below the window.
    fn cull_fallen(&mut self) {
        let bottom = f64::from(WINDOW_HEIGHT) / SCALE + 20.0;
        let mut i = self.world.body_count();
        while i > 0 {
            i -= 1;
            let body = self.world.body(i).unwrap();
            if !body.is_static && body.position().y > bottom {
                self.world.remove_body(i);
                self.entities.remove(i);
            }
        }
    }
}

impl EventHandler for MainState {
    fn update(&mut self, _ctx: &mut Context) -> GameResult {
        self.world.step(1.0 / 60.0, 16);
        self.cull_fallen();
        Ok(())
    }

    fn draw(&mut self, ctx: &mut Context) -> GameResult {
        let mut canvas = graphics::Canvas::from_frame(ctx, Color::BLACK);

        for i in 0..self.world.body_count() {
            let color = self.entities[i].color;
            let (radius, position, angle) = {
                let body = self.world.body(i).unwrap();
                let radius = match body.shape() {
                    Shape::Circle(circle) => Some(circle.radius),
                    Shape::Polygon(_) => None,
                };
                (radius, body.position(), body.angle())
            };

            match radius {
                Some(radius) => {
                    let mesh = Mesh::new_circle(
                        ctx,
                        DrawMode::fill(),
                        GVec2::new(0.0, 0.0),
                        (radius * SCALE) as f32,
                        0.5,
                        color,
                    )?;
                    canvas.draw(
                        &mesh,
                        DrawParam::new()
                            .dest(GVec2::new(
                                (position.x * SCALE) as f32,
                                (position.y * SCALE) as f32,
                            ))
                            .rotation(angle as f32),
                    );
                }
                None => {
                    let points: Vec<GVec2> = self
                        .world
                        .body_mut(i)
                        .unwrap()
                        .transformed_vertices()
                        .iter()
                        .map(|v| GVec2::new((v.x * SCALE) as f32, (v.y * SCALE) as f32))
                        .collect();
                    let mesh = Mesh::new_polygon(ctx, DrawMode::fill(), &points, color)?;
                    canvas.draw(&mesh, DrawParam::new());
                }
            }
        }

        canvas.finish(ctx)?;
        Ok(())
    }

    fn mouse_button_down_event(
        &mut self,
        _ctx: &mut Context,
        button: MouseButton,
        x: f32,
        y: f32,
    ) -> GameResult {
        let position = Vec2::new(f64::from(x) / SCALE, f64::from(y) / SCALE);
        match button {
            MouseButton::Left => self.spawn_box(position),
            MouseButton::Right => self.spawn_circle(position),
            _ => {}
        }
        Ok(())
    }

    fn key_down_event(&mut self, ctx: &mut Context, input: KeyInput, _repeated: bool) -> GameResult {
        if input.keycode == Some(KeyCode::Escape) {
            ctx.request_quit();
        }
        Ok(())
    }
}

fn main() -> GameResult {
    tracing_subscriber::fmt().init();

    let cb = ggez::ContextBuilder::new("planar_demo", "planar_physics")
        .window_setup(ggez::conf::WindowSetup::default().title("Planar Physics"))
        .window_mode(ggez::conf::WindowMode::default().dimensions(WINDOW_WIDTH, WINDOW_HEIGHT));

    let (ctx, event_loop) = cb.build()?;
    let state = MainState::new()?;
    event::run(ctx, event_loop, state)
}
