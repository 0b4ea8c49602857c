// src/ui/panel.rs
//! Benchmark overlay panel
//!
//! Shows the active strategy, the sampled frame rate and the last frame's
//! draw statistics, and lets the user pick another strategy.

use imgui::Condition;

use crate::drawing::DrawStats;
use crate::strategies::StrategyKind;

const ERROR_COLOR: [f32; 4] = [1.0, 0.45, 0.4, 1.0];

/// Snapshot of everything the overlay displays
#[derive(Debug, Clone, Default)]
pub struct OverlayState {
    pub strategy: StrategyKind,
    /// Last value published by the frame rate monitor
    pub fps: f64,
    pub particle_count: usize,
    pub draw: DrawStats,
    pub frame_time_ms: f32,
    /// Recent frame times, oldest first
    pub history: Vec<f32>,
    /// Last strategy setup failure, if any
    pub last_error: Option<String>,
}

/// Draws the strategy panel
///
/// Returns the strategy the user clicked, if it differs from the active one.
/// The caller applies it between frames.
pub fn strategy_panel(ui: &imgui::Ui, state: &OverlayState) -> Option<StrategyKind> {
    let display_size = ui.io().display_size;
    if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
        return None;
    }

    ui.window("Strategies")
        .size([300.0, 380.0], Condition::FirstUseEver)
        .position([20.0, 20.0], Condition::FirstUseEver)
        .collapsible(true)
        .build(|| {
            ui.text(format!("FPS: {:.1}", state.fps));
            ui.text(format!("Particles: {}", state.particle_count));
            ui.separator();

            let mut picked = None;
            for kind in StrategyKind::ALL {
                let label = format!("[{}] {}", kind.index(), kind);
                if ui.radio_button_bool(&label, kind == state.strategy) && kind != state.strategy {
                    picked = Some(kind);
                }
            }

            ui.separator();
            render_frame_stats(ui, state);

            if let Some(error) = &state.last_error {
                ui.separator();
                ui.text_colored(ERROR_COLOR, "Strategy setup failed:");
                ui.text_wrapped(error);
            }
            picked
        })
        .flatten()
}

fn render_frame_stats(ui: &imgui::Ui, state: &OverlayState) {
    ui.text(format!("Draw calls: {}", state.draw.draw_calls));
    ui.text(format!("Segments: {}", state.draw.segments));
    ui.text(format!("Frame time: {:.2} ms", state.frame_time_ms));

    if state.history.is_empty() {
        ui.text_disabled("No frames yet");
        return;
    }
    ui.plot_lines("##frame_times", &state.history)
        .graph_size([0.0, 60.0])
        .scale_min(0.0)
        .build();
}
