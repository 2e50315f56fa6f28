//! wgpu host for the shared layout.

pub mod layouts;
pub mod pipeline;
pub mod resources;

use log::{info, warn};

pub use layouts::GpuLayouts;
pub use pipeline::{GpuSimulation, KernelSources, Kernels};
pub use resources::{check_device_limits, SimulationResources};

/// Requests a device without a surface.
pub async fn request_device() -> Option<(wgpu::Adapter, wgpu::Device, wgpu::Queue)> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            force_fallback_adapter: false,
            compatible_surface: None,
        })
        .await?;
    let info = adapter.get_info();
    info!("using adapter {} ({:?})", info.name, info.backend);

    // read_write storage access on the r32float trail field
    let mut required_features = wgpu::Features::empty();
    if adapter
        .features()
        .contains(wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES)
    {
        required_features |= wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES;
    } else {
        warn!("adapter lacks adapter-specific format features, trail deposits need read_write r32float");
    }

    let requested = adapter
        .request_device(
            &wgpu::DeviceDescriptor {
                label: None,
                required_features,
                required_limits: wgpu::Limits::default(),
            },
            None,
        )
        .await;
    match requested {
        Ok((device, queue)) => Some((adapter, device, queue)),
        Err(err) => {
            warn!("failed to open device: {}", err);
            None
        }
    }
}
