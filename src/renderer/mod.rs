//! Rendering module
//!
//! `scene` turns a frame into draw commands; backends paint them. The
//! canvas backend only exists on the web.

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

pub use assets::{AssetSlot, Assets, icon_path};
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasBackend;
pub use scene::{DrawCmd, Rgba, SceneInfo, build_draw_list, css_rgba};
