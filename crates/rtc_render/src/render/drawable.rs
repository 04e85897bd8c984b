//! Drawable seam
//!
//! Anything the renderer visits during a frame. The frame context is passed
//! in explicitly for the duration of each call and must not be retained.

use super::frame_context::FrameContext;

/// An object that renders itself using the frame context
pub trait Drawable {
    /// Draw into the current render pass
    fn draw(&self, ctx: &mut FrameContext);

    /// Draw into the pick target; does nothing for non-pickable drawables
    fn draw_pick(&self, _ctx: &mut FrameContext) {}
}
