//! Frame animation and sprite texture swapping.

use tilewalk_ecs::prelude::*;

use super::SystemContext;

/// Advance every [`Animation`] by `dt` and point a sibling [`Render`] at the
/// frame now showing.
pub fn animation_system(
    world: &World,
    ctx: &mut SystemContext<'_>,
    id: SystemId,
    cmds: &mut CommandBuffer,
) {
    for (entity, (anim, render)) in world.query::<(&Animation, Option<&Render>)>() {
        let next = anim.advanced(ctx.dt);
        let frame_changed = next.current_frame != anim.current_frame;

        if let (Some(render), Some(texture)) = (render, next.current_texture()) {
            if render.texture_path != texture {
                cmds.replace(
                    entity,
                    render.with_texture(texture),
                    id,
                    CausalReason::Timer("animation_frame".to_owned()),
                );
            }
        }
        if frame_changed {
            tracing::trace!(%entity, frame = next.current_frame, "animation frame advanced");
        }
        cmds.replace(entity, next, id, CausalReason::Timer("animation_clock".to_owned()));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
