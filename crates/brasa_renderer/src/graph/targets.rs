//! Attachment declarations and the framebuffer built from them.
//!
//! A pass declares an ordered list of color attachments (texture + mip
//! level) and an optional depth attachment.  `Framebuffer::new` turns that
//! declaration into concrete attachment views exactly once, at pass
//! initialization — slot index equals list position, never reordered — and
//! rejects incomplete sets up front, because an invalid attachment
//! combination is a programming error rather than a runtime condition.

use std::sync::Arc;

use crate::error::RenderError;
use crate::resources::texture::{Texture, TextureDesc};

/// A texture bound as a color target slot.
#[derive(Clone)]
pub struct ColorAttachment {
    pub target: Arc<Texture>,
    pub mip_level: u32,
    /// Load operation at the start of the pass (clear or keep contents).
    pub load: wgpu::LoadOp<wgpu::Color>,
}

impl ColorAttachment {
    pub fn cleared(target: Arc<Texture>, clear: wgpu::Color) -> Self {
        Self {
            target,
            mip_level: 0,
            load: wgpu::LoadOp::Clear(clear),
        }
    }

    pub fn loaded(target: Arc<Texture>) -> Self {
        Self {
            target,
            mip_level: 0,
            load: wgpu::LoadOp::Load,
        }
    }
}

/// A texture bound as the depth target.
#[derive(Clone)]
pub struct DepthAttachment {
    pub target: Arc<Texture>,
    pub clear_before_pass: bool,
}

/// The attachment set a pass declares from `configure_targets`.
#[derive(Clone, Default)]
pub struct TargetConfig {
    pub colors: Vec<ColorAttachment>,
    pub depth: Option<DepthAttachment>,
}

/// Render-state key a pass hands to draw-command resolution; pipelines are
/// cached per distinct state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TargetState {
    /// Color formats in attachment-list order.
    pub color_formats: Vec<wgpu::TextureFormat>,
    pub depth_format: Option<wgpu::TextureFormat>,
    pub depth_write: bool,
    pub depth_compare: wgpu::CompareFunction,
}

/// The GPU object set collecting a pass's attachments into one renderable
/// target. Views are created once; the attachment set is fixed afterwards.
pub struct Framebuffer {
    color_views: Vec<wgpu::TextureView>,
    color_loads: Vec<wgpu::LoadOp<wgpu::Color>>,
    depth_view: Option<wgpu::TextureView>,
    depth_clear: bool,
    state: TargetState,
    width: u32,
    height: u32,
}

impl Framebuffer {
    /// Builds the framebuffer for `config`, failing fatally if the set is
    /// not complete (see [`validate_attachments`]).
    pub fn new(pass: &str, config: &TargetConfig) -> Result<Self, RenderError> {
        let color_descs: Vec<(TextureDesc, u32)> = config
            .colors
            .iter()
            .map(|c| (c.target.desc, c.mip_level))
            .collect();
        let depth_desc = config.depth.as_ref().map(|d| d.target.desc);
        let (width, height) = validate_attachments(pass, &color_descs, depth_desc.as_ref())?;

        let color_views = config
            .colors
            .iter()
            .map(|c| c.target.mip_view(c.mip_level))
            .collect();
        let color_loads = config.colors.iter().map(|c| c.load).collect();
        let depth_view = config.depth.as_ref().map(|d| d.target.mip_view(0));

        let state = TargetState {
            color_formats: color_descs.iter().map(|(d, _)| d.format).collect(),
            depth_format: depth_desc.map(|d| d.format),
            depth_write: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
        };

        Ok(Self {
            color_views,
            color_loads,
            depth_view,
            depth_clear: config.depth.as_ref().map_or(false, |d| d.clear_before_pass),
            state,
            width,
            height,
        })
    }

    /// Render-state key for pipeline compilation against these targets.
    pub fn state(&self) -> &TargetState {
        &self.state
    }

    /// Extent shared by every attachment.
    pub fn extent(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Binds this framebuffer as the current draw target by beginning a
    /// wgpu render pass over its attachment views.
    pub fn begin<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        label: &str,
    ) -> wgpu::RenderPass<'e> {
        let color_attachments: Vec<Option<wgpu::RenderPassColorAttachment>> = self
            .color_views
            .iter()
            .zip(&self.color_loads)
            .map(|(view, load)| {
                Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: *load,
                        store: wgpu::StoreOp::Store,
                    },
                })
            })
            .collect();

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &color_attachments,
            depth_stencil_attachment: self.depth_view.as_ref().map(|view| {
                wgpu::RenderPassDepthStencilAttachment {
                    view,
                    depth_ops: Some(wgpu::Operations {
                        load: if self.depth_clear {
                            wgpu::LoadOp::Clear(1.0)
                        } else {
                            wgpu::LoadOp::Load
                        },
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            occlusion_query_set: None,
            timestamp_writes: None,
        })
    }
}

/// Completeness rules for an attachment set.  Returns the shared extent.
///
/// - there must be at least one attachment (color or depth);
/// - color attachments must use color-renderable (non-depth) formats and
///   reference an existing mip level;
/// - the depth attachment must use a depth format;
/// - every attachment must share the same extent, accounting for the
///   selected mip level of each color target.
pub fn validate_attachments(
    pass: &str,
    colors: &[(TextureDesc, u32)],
    depth: Option<&TextureDesc>,
) -> Result<(u32, u32), RenderError> {
    let incomplete = |reason: String| RenderError::IncompleteFramebuffer {
        pass: pass.to_string(),
        reason,
    };

    if colors.is_empty() && depth.is_none() {
        return Err(incomplete("no attachments declared".into()));
    }

    let mut extent: Option<(u32, u32)> = None;
    let mut check_extent = |label: String, e: (u32, u32)| match extent {
        None => {
            extent = Some(e);
            Ok(())
        }
        Some(prev) if prev == e => Ok(()),
        Some(prev) => Err(incomplete(format!(
            "{label} extent {e:?} does not match {prev:?}"
        ))),
    };

    for (slot, (desc, mip)) in colors.iter().enumerate() {
        if desc.is_depth() {
            return Err(incomplete(format!(
                "color slot {slot} uses depth format {:?}",
                desc.format
            )));
        }
        if *mip >= desc.mip_count {
            return Err(incomplete(format!(
                "color slot {slot} selects mip {mip} of a {}-level texture",
                desc.mip_count
            )));
        }
        check_extent(format!("color slot {slot}"), desc.mip_extent(*mip))?;
    }

    if let Some(desc) = depth {
        if !desc.is_depth() {
            return Err(incomplete(format!(
                "depth attachment uses color format {:?}",
                desc.format
            )));
        }
        check_extent("depth attachment".into(), (desc.width, desc.height))?;
    }

    Ok(extent.expect("at least one attachment checked"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color_desc(w: u32, h: u32) -> TextureDesc {
        TextureDesc::d2("c", w, h, wgpu::TextureFormat::Rgba8UnormSrgb)
    }

    fn depth_desc(w: u32, h: u32) -> TextureDesc {
        TextureDesc::d2("d", w, h, wgpu::TextureFormat::Depth32Float)
    }

    #[test]
    fn k_attachments_keep_list_order() {
        let colors: Vec<(TextureDesc, u32)> = (0..4).map(|_| (color_desc(64, 64), 0)).collect();
        let extent = validate_attachments("p", &colors, None).unwrap();
        assert_eq!(extent, (64, 64));
        // Slot order is attachment-list order — formats read back 0..K-1.
        let formats: Vec<_> = colors.iter().map(|(d, _)| d.format).collect();
        assert_eq!(formats.len(), 4);
    }

    #[test]
    fn empty_attachment_set_is_incomplete() {
        assert!(validate_attachments("p", &[], None).is_err());
    }

    #[test]
    fn mismatched_extents_are_incomplete() {
        let colors = vec![(color_desc(64, 64), 0), (color_desc(32, 64), 0)];
        assert!(validate_attachments("p", &colors, None).is_err());
    }

    #[test]
    fn depth_format_in_color_slot_is_incomplete() {
        let colors = vec![(depth_desc(64, 64), 0)];
        assert!(validate_attachments("p", &colors, None).is_err());
    }

    #[test]
    fn color_format_as_depth_is_incomplete() {
        let depth = color_desc(64, 64);
        assert!(validate_attachments("p", &[], Some(&depth)).is_err());
    }

    #[test]
    fn mip_level_extent_must_match_other_attachments() {
        // Mip 1 of a 128×128 texture is 64×64, matching the second target.
        let mut mipped = color_desc(128, 128);
        mipped.mip_count = 8;
        let colors = vec![(mipped, 1), (color_desc(64, 64), 0)];
        assert_eq!(validate_attachments("p", &colors, None).unwrap(), (64, 64));
    }

    #[test]
    fn out_of_range_mip_is_incomplete() {
        let colors = vec![(color_desc(64, 64), 1)]; // mip_count is 1
        assert!(validate_attachments("p", &colors, None).is_err());
    }

    #[test]
    fn depth_only_set_is_complete() {
        let depth = depth_desc(32, 32);
        assert_eq!(validate_attachments("p", &[], Some(&depth)).unwrap(), (32, 32));
    }
}
