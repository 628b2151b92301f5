//! Stellar Viewer - Bevy front end for the stellar life cycle animation
//!
//! The core renders each frame into a software [`PixelCanvas`], which is
//! copied into a texture shown on a full-window sprite. Stage text,
//! navigation buttons and the progress row are Bevy UI.
//!
//! Usage:
//!   cargo run -p stellar-viewer
//!   cargo run -p stellar-viewer -- --lang ko --seed 7 --config viewer.json

mod config;

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::window::WindowResized;
use stellar_core::canvas::PixelCanvas;
use stellar_core::catalog::Language;
use stellar_core::driver::AnimationDriver;
use stellar_core::engine::SimulationEngine;
use stellar_core::sequencer::Transition;

use config::ViewerConfig;

struct Args {
    config: Option<String>,
    language: Option<Language>,
    seed: Option<u64>,
}

fn parse_args() -> Result<Args, String> {
    let mut parsed = Args {
        config: None,
        language: None,
        seed: None,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        let mut value = || args.next().ok_or_else(|| format!("{} needs a value", arg));
        match arg.as_str() {
            "--config" => parsed.config = Some(value()?),
            "--lang" => parsed.language = Some(value()?.parse::<Language>().map_err(|e| format!("{}", e))?),
            "--seed" => {
                let raw = value()?;
                parsed.seed = Some(raw.parse::<u64>().map_err(|e| format!("bad seed {}: {}", raw, e))?);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(parsed)
}

fn load_config() -> Result<ViewerConfig, String> {
    let args = parse_args()?;
    let mut config = match &args.config {
        Some(path) => ViewerConfig::load(path).map_err(|e| format!("{}: {}", path, e))?,
        None => ViewerConfig::default(),
    };
    if let Some(language) = args.language {
        config.language = language;
    }
    if args.seed.is_some() {
        config.engine.seed = args.seed;
    }
    config.engine.width = config.width;
    config.engine.height = config.height;
    Ok(config)
}

fn main() {
    let config = match load_config() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("stellar-viewer: {}", e);
            std::process::exit(2);
        }
    };
    let engine = match SimulationEngine::with_language(config.engine.clone(), config.language) {
        Ok(engine) => engine,
        Err(e) => {
            eprintln!("stellar-viewer: failed to load stage catalog: {}", e);
            std::process::exit(1);
        }
    };

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: config.title.clone(),
                resolution: (config.width, config.height).into(),
                present_mode: bevy::window::PresentMode::AutoVsync,
                ..default()
            }),
            ..default()
        }))
        .add_plugins(bevy::diagnostic::FrameTimeDiagnosticsPlugin::default())
        .add_plugins(bevy::diagnostic::LogDiagnosticsPlugin::default())
        .insert_resource(ClearColor(Color::srgb_u8(5, 5, 16)))
        .insert_resource(SimWrapper(engine))
        .insert_resource(Driver(AnimationDriver::new()))
        .insert_resource(Settings(config))
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                handle_resize,
                handle_buttons,
                handle_keyboard,
                render_frame,
                sync_stage_ui,
            )
                .chain(),
        )
        .run();
}

#[derive(Resource)]
struct SimWrapper(SimulationEngine);

#[derive(Resource)]
struct Driver(AnimationDriver);

#[derive(Resource)]
struct Settings(ViewerConfig);

/// Software canvas plus the texture it is copied into every frame
#[derive(Resource)]
struct FrameBuffer {
    canvas: PixelCanvas,
    image: Handle<Image>,
}

#[derive(Component)]
struct StageSprite;

#[derive(Component)]
struct StageTitle;

#[derive(Component)]
struct StageDescription;

/// Progress indicator for the stage at this index
#[derive(Component)]
struct StageDot(usize);

#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum NavButton {
    Prev,
    Next,
}

const DOT_IDLE: Color = Color::srgba(1.0, 1.0, 1.0, 0.25);
const DOT_ACTIVE: Color = Color::srgb(1.0, 0.85, 0.4);
const BUTTON_ENABLED: Color = Color::srgba(1.0, 1.0, 1.0, 0.15);
const BUTTON_DISABLED: Color = Color::srgba(1.0, 1.0, 1.0, 0.04);

fn texture_extent(width: usize, height: usize) -> Extent3d {
    Extent3d {
        width: width.max(1) as u32,
        height: height.max(1) as u32,
        depth_or_array_layers: 1,
    }
}

fn setup(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    asset_server: Res<AssetServer>,
    settings: Res<Settings>,
    sim: Res<SimWrapper>,
) {
    let config = &settings.0;
    commands.spawn(Camera2d);

    let (width, height) = config.canvas_size(config.width, config.height);
    let mut canvas = PixelCanvas::new(width, height);
    canvas.set_device_scale(config.render_scale.clamp(0.1, 1.0));

    let image = images.add(Image::new_fill(
        texture_extent(width, height),
        TextureDimension::D2,
        &[5, 5, 16, 255],
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    ));
    commands.spawn((
        Sprite {
            image: image.clone(),
            custom_size: Some(Vec2::new(config.width, config.height)),
            ..default()
        },
        StageSprite,
    ));
    commands.insert_resource(FrameBuffer { canvas, image });

    let font: Handle<Font> = match &config.font {
        Some(path) => asset_server.load(path.clone()),
        None => Handle::default(),
    };

    // Stage text, top left
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(32.0),
            left: Val::Px(32.0),
            max_width: Val::Px(460.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(10.0),
            ..default()
        })
        .with_children(|panel| {
            panel.spawn((
                Text::new(""),
                TextFont {
                    font: font.clone(),
                    font_size: 30.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                StageTitle,
            ));
            panel.spawn((
                Text::new(""),
                TextFont {
                    font: font.clone(),
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgba(0.85, 0.85, 0.92, 0.9)),
                StageDescription,
            ));
        });

    // Navigation row, bottom center
    let stage_count = sim.0.stage_count();
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(28.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            column_gap: Val::Px(18.0),
            ..default()
        })
        .with_children(|row| {
            spawn_nav_button(row, NavButton::Prev, "<", font.clone());
            row.spawn(Node {
                column_gap: Val::Px(8.0),
                ..default()
            })
            .with_children(|dots| {
                for index in 0..stage_count {
                    dots.spawn((
                        Node {
                            width: Val::Px(12.0),
                            height: Val::Px(12.0),
                            ..default()
                        },
                        BorderRadius::MAX,
                        BackgroundColor(DOT_IDLE),
                        StageDot(index),
                    ));
                }
            });
            spawn_nav_button(row, NavButton::Next, ">", font.clone());
        });

    info!(
        "Viewer ready: {} stages, canvas {}x{} at scale {}",
        stage_count,
        width,
        height,
        config.render_scale
    );
}

fn spawn_nav_button(parent: &mut ChildBuilder, kind: NavButton, label: &str, font: Handle<Font>) {
    parent
        .spawn((
            Button,
            Node {
                width: Val::Px(44.0),
                height: Val::Px(44.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BorderRadius::all(Val::Px(8.0)),
            BackgroundColor(BUTTON_ENABLED),
            kind,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font,
                    font_size: 22.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}

fn handle_resize(
    mut events: EventReader<WindowResized>,
    settings: Res<Settings>,
    mut sim: ResMut<SimWrapper>,
    mut frame: ResMut<FrameBuffer>,
    mut images: ResMut<Assets<Image>>,
    mut sprites: Query<&mut Sprite, With<StageSprite>>,
) {
    // Only the final size of a burst matters
    let Some(event) = events.read().last() else {
        return;
    };
    let (width, height) = (event.width, event.height);
    let (canvas_w, canvas_h) = settings.0.canvas_size(width, height);

    frame.canvas.resize(canvas_w, canvas_h);
    if let Some(image) = images.get_mut(&frame.image) {
        image.resize(texture_extent(canvas_w, canvas_h));
    }
    for mut sprite in &mut sprites {
        sprite.custom_size = Some(Vec2::new(width, height));
    }
    sim.0.resize(width, height);
}

fn handle_buttons(
    buttons: Query<(&Interaction, &NavButton), Changed<Interaction>>,
    mut driver: ResMut<Driver>,
) {
    for (interaction, kind) in &buttons {
        if *interaction != Interaction::Pressed {
            continue;
        }
        driver.0.request(match kind {
            NavButton::Prev => Transition::Retreat,
            NavButton::Next => Transition::Advance,
        });
    }
}

const STAGE_KEYS: [KeyCode; 7] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
];

fn handle_keyboard(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut driver: ResMut<Driver>,
    mut exit: EventWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        driver.0.stop();
        info!("Animation stopped after {} frames", driver.0.frames());
        exit.send(AppExit::Success);
        return;
    }
    if keyboard.just_pressed(KeyCode::ArrowRight) {
        driver.0.request(Transition::Advance);
    }
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        driver.0.request(Transition::Retreat);
    }
    for (index, key) in STAGE_KEYS.iter().enumerate() {
        if keyboard.just_pressed(*key) {
            driver.0.request(Transition::JumpTo(index));
        }
    }
}

fn render_frame(
    mut sim: ResMut<SimWrapper>,
    mut driver: ResMut<Driver>,
    mut frame: ResMut<FrameBuffer>,
    mut images: ResMut<Assets<Image>>,
) {
    let frame = &mut *frame;
    frame.canvas.begin_frame();
    if !driver.0.frame(&mut sim.0, &mut frame.canvas) {
        return;
    }

    let Some(image) = images.get_mut(&frame.image) else {
        return;
    };
    let expected = frame.canvas.width() * frame.canvas.height() * 4;
    if image.data.len() == expected {
        frame.canvas.write_rgba8(&mut image.data);
    }
}

fn sync_stage_ui(
    sim: Res<SimWrapper>,
    mut shown: Local<Option<usize>>,
    mut titles: Query<&mut Text, (With<StageTitle>, Without<StageDescription>)>,
    mut descriptions: Query<&mut Text, (With<StageDescription>, Without<StageTitle>)>,
    mut dots: Query<(&StageDot, &mut BackgroundColor), Without<NavButton>>,
    mut buttons: Query<(&NavButton, &mut BackgroundColor), Without<StageDot>>,
) {
    let engine = &sim.0;
    let index = engine.current_index();
    if *shown == Some(index) {
        return;
    }
    *shown = Some(index);

    let info = engine.current_info();
    for mut text in &mut titles {
        **text = info.title.clone();
    }
    for mut text in &mut descriptions {
        **text = info.description.clone();
    }
    for (dot, mut color) in &mut dots {
        color.0 = if dot.0 == index { DOT_ACTIVE } else { DOT_IDLE };
    }
    for (kind, mut color) in &mut buttons {
        let enabled = match kind {
            NavButton::Prev => !engine.is_first(),
            NavButton::Next => !engine.is_last(),
        };
        color.0 = if enabled { BUTTON_ENABLED } else { BUTTON_DISABLED };
    }
}
