use winit::dpi::PhysicalSize;

use super::SurfaceErrorAction;

/// First format whose sRGB-ness matches `prefer_srgb`, else whatever the
/// adapter lists first.
pub(crate) fn choose_surface_format(
    formats: &[wgpu::TextureFormat],
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    formats
        .iter()
        .find(|f| f.is_srgb() == prefer_srgb)
        .or_else(|| formats.first())
        .copied()
}

pub(crate) fn choose_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    match requested {
        Some(mode) if supported.contains(&mode) => mode,
        _ => supported.first().copied().unwrap_or(wgpu::CompositeAlphaMode::Auto),
    }
}

/// Window surface plus the configuration last applied to it.
pub(crate) struct Swapchain<'w> {
    surface: wgpu::Surface<'w>,
    config: wgpu::SurfaceConfiguration,
}

impl<'w> Swapchain<'w> {
    pub(crate) fn new(surface: wgpu::Surface<'w>, config: wgpu::SurfaceConfiguration) -> Self {
        Self { surface, config }
    }

    pub(crate) fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    fn extent_is_valid(&self) -> bool {
        self.config.width > 0 && self.config.height > 0
    }

    /// Applies the current configuration. A zero extent is skipped; wgpu
    /// rejects it.
    pub(crate) fn configure(&self, device: &wgpu::Device) {
        if self.extent_is_valid() {
            self.surface.configure(device, &self.config);
        }
    }

    pub(crate) fn set_extent(&mut self, device: &wgpu::Device, size: PhysicalSize<u32>) {
        self.config.width = size.width;
        self.config.height = size.height;
        self.configure(device);
    }

    pub(crate) fn acquire(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }

    /// Maps an acquisition failure to a recovery action, reconfiguring when
    /// the surface went stale.
    pub(crate) fn recover(&self, device: &wgpu::Device, err: wgpu::SurfaceError) -> SurfaceErrorAction {
        log::debug!("surface error: {err}");
        match err {
            wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated => {
                self.configure(device);
                SurfaceErrorAction::Reconfigured
            }
            wgpu::SurfaceError::OutOfMemory => {
                log::error!("surface out of memory");
                SurfaceErrorAction::Fatal
            }
            wgpu::SurfaceError::Timeout | wgpu::SurfaceError::Other => SurfaceErrorAction::SkipFrame,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::TextureFormat as F;

    #[test]
    fn linear_format_is_found_behind_srgb() {
        let formats = [F::Bgra8UnormSrgb, F::Bgra8Unorm];
        assert_eq!(choose_surface_format(&formats, false), Some(F::Bgra8Unorm));
        assert_eq!(choose_surface_format(&formats, true), Some(F::Bgra8UnormSrgb));
    }

    #[test]
    fn falls_back_to_first_format() {
        assert_eq!(choose_surface_format(&[F::Bgra8UnormSrgb], false), Some(F::Bgra8UnormSrgb));
        assert_eq!(choose_surface_format(&[], false), None);
    }

    #[test]
    fn unsupported_alpha_mode_is_replaced() {
        use wgpu::CompositeAlphaMode as A;
        assert_eq!(choose_alpha_mode(&[A::Opaque], Some(A::PreMultiplied)), A::Opaque);
        assert_eq!(choose_alpha_mode(&[A::Opaque, A::PreMultiplied], Some(A::PreMultiplied)), A::PreMultiplied);
        assert_eq!(choose_alpha_mode(&[], None), A::Auto);
    }
}
