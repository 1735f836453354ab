//! Rendering module
//!
//! The simulation only knows the `Renderer` capability; the web build draws
//! with Canvas 2D.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::sim::{Entity, GameState, Indicator};

/// Drawing surface
pub trait Renderer {
    fn clear(&mut self);
    fn draw_entity(&mut self, entity: &Entity);
    fn draw_indicator(&mut self, indicator: &Indicator);
}

/// Draw one frame: clear, entities in spawn order, then indicators on top
pub fn render(state: &GameState, renderer: &mut dyn Renderer, show_indicators: bool) {
    renderer.clear();
    for entity in &state.entities {
        renderer.draw_entity(entity);
    }
    if show_indicators {
        for indicator in &state.indicators {
            renderer.draw_indicator(indicator);
        }
    }
}
