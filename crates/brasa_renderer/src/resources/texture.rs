//! GPU texture wrapper: immutable storage descriptor, mutable contents and
//! sampling state.
//!
//! Storage (dimension, format, extent, mip count) is fixed at creation; the
//! pixel contents and the mip chain can be rewritten at any time.  Filter
//! and wrap modes are independent mutable sampling state — changing either
//! recreates the sampler object, which takes effect the next time a material
//! bind group is built.

use crate::resources::mipmap::MipmapGenerator;

/// Texture storage parameters, fixed at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureDesc {
    pub label: &'static str,
    pub dimension: wgpu::TextureDimension,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
    /// Depth for 3-D textures; 1 otherwise.
    pub depth: u32,
    pub mip_count: u32,
}

impl TextureDesc {
    /// Shorthand for a 2-D texture with a single mip level.
    pub fn d2(label: &'static str, width: u32, height: u32, format: wgpu::TextureFormat) -> Self {
        Self {
            label,
            dimension: wgpu::TextureDimension::D2,
            format,
            width,
            height,
            depth: 1,
            mip_count: 1,
        }
    }

    /// Extent of a given mip level (each level halves, clamped at 1).
    pub fn mip_extent(&self, level: u32) -> (u32, u32) {
        ((self.width >> level).max(1), (self.height >> level).max(1))
    }

    /// Number of levels in a full mip chain down to 1×1.
    pub fn full_mip_chain(width: u32, height: u32) -> u32 {
        32 - width.max(height).max(1).leading_zeros()
    }

    pub fn is_depth(&self) -> bool {
        self.format.is_depth_stencil_format()
    }
}

/// Minification/magnification filter applied when sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Nearest,
    Linear,
}

/// Addressing of texture coordinates outside [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    Clamp,
    Repeat,
}

pub struct Texture {
    pub texture: wgpu::Texture,
    /// Default view over all mip levels.
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub desc: TextureDesc,
    filter: FilterMode,
    wrap: WrapMode,
}

impl Texture {
    /// Allocates immutable-format GPU storage sized for `desc.mip_count`
    /// levels.  The texture is usable as a render attachment, a sampled
    /// binding and (color formats only) an upload destination.
    pub fn new(device: &wgpu::Device, desc: TextureDesc) -> Self {
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING;
        if !desc.is_depth() {
            usage |= wgpu::TextureUsages::COPY_DST;
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size: wgpu::Extent3d {
                width: desc.width,
                height: desc.height,
                depth_or_array_layers: desc.depth.max(1),
            },
            mip_level_count: desc.mip_count.max(1),
            sample_count: 1,
            dimension: desc.dimension,
            format: desc.format,
            usage,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let filter = FilterMode::Linear;
        let wrap = WrapMode::Clamp;
        let sampler = create_sampler(device, desc.label, filter, wrap);

        Self {
            texture,
            view,
            sampler,
            desc,
            filter,
            wrap,
        }
    }

    /// Uploads a full image for mip level 0.
    ///
    /// `pixels` must contain exactly `width × height × depth` texels in the
    /// descriptor's format — mismatched sizes are a caller contract
    /// violation, not a detected failure.
    pub fn set_data(&self, queue: &wgpu::Queue, pixels: &[u8]) {
        let bytes_per_texel = self
            .desc
            .format
            .block_copy_size(None)
            .unwrap_or(4);
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_texel * self.desc.width),
                rows_per_image: Some(self.desc.height),
            },
            wgpu::Extent3d {
                width: self.desc.width,
                height: self.desc.height,
                depth_or_array_layers: self.desc.depth.max(1),
            },
        );
    }

    /// Fills mip levels 1.. from level 0.  A single-level texture is left
    /// untouched; skipping the call entirely is equally valid for those.
    pub fn generate_all_mips(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        generator: &mut MipmapGenerator,
    ) {
        generator.generate(device, queue, self);
    }

    pub fn filter_mode(&self) -> FilterMode {
        self.filter
    }

    pub fn wrap_mode(&self) -> WrapMode {
        self.wrap
    }

    /// Replaces the sampler with one using the given filter mode.
    pub fn set_filter_mode(&mut self, device: &wgpu::Device, filter: FilterMode) {
        self.filter = filter;
        self.sampler = create_sampler(device, self.desc.label, self.filter, self.wrap);
    }

    /// Replaces the sampler with one using the given wrap mode.
    pub fn set_wrap_mode(&mut self, device: &wgpu::Device, wrap: WrapMode) {
        self.wrap = wrap;
        self.sampler = create_sampler(device, self.desc.label, self.filter, self.wrap);
    }

    /// View over a single mip level — used for framebuffer attachments.
    pub fn mip_view(&self, level: u32) -> wgpu::TextureView {
        self.texture.create_view(&wgpu::TextureViewDescriptor {
            base_mip_level: level,
            mip_level_count: Some(1),
            ..Default::default()
        })
    }
}

fn create_sampler(
    device: &wgpu::Device,
    label: &str,
    filter: FilterMode,
    wrap: WrapMode,
) -> wgpu::Sampler {
    let f = match filter {
        FilterMode::Nearest => wgpu::FilterMode::Nearest,
        FilterMode::Linear => wgpu::FilterMode::Linear,
    };
    let address = match wrap {
        WrapMode::Clamp => wgpu::AddressMode::ClampToEdge,
        WrapMode::Repeat => wgpu::AddressMode::Repeat,
    };
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: address,
        address_mode_v: address,
        address_mode_w: address,
        mag_filter: f,
        min_filter: f,
        mipmap_filter: f,
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mip_extent_halves_and_clamps() {
        let desc = TextureDesc {
            mip_count: 11,
            ..TextureDesc::d2("t", 1024, 768, wgpu::TextureFormat::Rgba8Unorm)
        };
        assert_eq!(desc.mip_extent(0), (1024, 768));
        assert_eq!(desc.mip_extent(1), (512, 384));
        assert_eq!(desc.mip_extent(10), (1, 1));
        // Past the bottom of the chain the extent stays clamped at 1×1.
        assert_eq!(desc.mip_extent(12), (1, 1));
    }

    #[test]
    fn full_mip_chain_level_count() {
        assert_eq!(TextureDesc::full_mip_chain(1, 1), 1);
        assert_eq!(TextureDesc::full_mip_chain(2, 2), 2);
        assert_eq!(TextureDesc::full_mip_chain(1024, 1024), 11);
        assert_eq!(TextureDesc::full_mip_chain(800, 600), 10);
    }

    #[test]
    fn depth_formats_are_classified() {
        let color = TextureDesc::d2("c", 4, 4, wgpu::TextureFormat::Rgba8UnormSrgb);
        let depth = TextureDesc::d2("d", 4, 4, wgpu::TextureFormat::Depth32Float);
        assert!(!color.is_depth());
        assert!(depth.is_depth());
    }
}
