//! Graphics capability probe, isolating boundary and static fallback.
//!
//! Creative Mode needs a working graphics stack. Before the scene is built
//! the host asks `probe_graphics()` for an adapter; scene construction then
//! runs inside `isolate()`, which turns a panic into a `SceneError`. Either
//! failure is shown as a `FallbackView` instead of a crashed window.

use std::fmt;
use std::panic::{self, AssertUnwindSafe};

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("no compatible graphics adapter found")]
    NoAdapter,
    #[error("graphics device request failed: {0}")]
    Device(String),
    #[error("scene construction failed: {0}")]
    Panicked(String),
    #[error("failed to open window: {0}")]
    Window(String),
}

/// What the probe found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphicsCapability {
    pub adapter: String,
    pub backend: String,
}

/// Request a graphics adapter and a device with WebGL2-level limits.
#[cfg(feature = "gpu-probe")]
pub fn probe_graphics() -> Result<GraphicsCapability, SceneError> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
        power_preference: wgpu::PowerPreference::LowPower,
        compatible_surface: None,
        force_fallback_adapter: false,
    }))
    .ok_or(SceneError::NoAdapter)?;

    let info = adapter.get_info();
    pollster::block_on(adapter.request_device(
        &wgpu::DeviceDescriptor {
            label: Some("portfolio-scene probe"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_webgl2_defaults(),
            memory_hints: wgpu::MemoryHints::MemoryUsage,
        },
        None,
    ))
    .map_err(|e| SceneError::Device(e.to_string()))?;

    let cap = GraphicsCapability {
        adapter: info.name,
        backend: format!("{:?}", info.backend),
    };
    log::info!("graphics adapter: {} ({})", cap.adapter, cap.backend);
    Ok(cap)
}

/// Without the probe the host trusts its own renderer to report failures.
#[cfg(not(feature = "gpu-probe"))]
pub fn probe_graphics() -> Result<GraphicsCapability, SceneError> {
    log::info!("graphics probe disabled; assuming a capable renderer");
    Ok(GraphicsCapability {
        adapter: "unprobed".to_string(),
        backend: "host".to_string(),
    })
}

/// Run `f`, converting a panic into `SceneError::Panicked`.
///
/// The default panic hook still prints the panic message; the caller gets an
/// error value and can keep running.
pub fn isolate<T>(f: impl FnOnce() -> T) -> Result<T, SceneError> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "unknown panic".to_string()
        };
        log::error!("scene isolated after panic: {}", msg);
        SceneError::Panicked(msg)
    })
}

/// Static replacement shown when the 3D scene cannot run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackView {
    pub title: &'static str,
    pub message: &'static str,
    pub suggestion: &'static str,
    pub cause: String,
}

impl FallbackView {
    pub fn from_error(err: &SceneError) -> Self {
        Self {
            title: "3D View Unavailable",
            message: "Your device or graphics driver does not support the hardware \
                      acceleration this 3D view requires.",
            suggestion: "Switch to Dev Mode to browse the same projects and certificates.",
            cause: err.to_string(),
        }
    }
}

impl fmt::Display for FallbackView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.message)?;
        writeln!(f, "{}", self.suggestion)?;
        write!(f, "(cause: {})", self.cause)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isolate_passes_value_through() {
        assert_eq!(isolate(|| 41 + 1).unwrap(), 42);
    }

    #[test]
    fn test_isolate_catches_panic() {
        let r: Result<(), _> = isolate(|| panic!("boom"));
        match r {
            Err(SceneError::Panicked(msg)) => assert_eq!(msg, "boom"),
            other => panic!("expected Panicked, got {:?}", other),
        }
        let r: Result<(), _> = isolate(|| panic!("code {}", 7));
        assert!(matches!(r, Err(SceneError::Panicked(ref m)) if m == "code 7"));
    }

    #[test]
    fn test_isolate_catches_panic_over_borrowed_state() {
        let mut frames = 0u32;
        let r = isolate(|| {
            frames += 1;
            if frames > 0 {
                panic!("frame {} failed", frames);
            }
        });
        assert!(matches!(r, Err(SceneError::Panicked(ref m)) if m == "frame 1 failed"));
        assert_eq!(frames, 1);
    }

    #[test]
    fn test_fallback_text() {
        let view = FallbackView::from_error(&SceneError::NoAdapter);
        assert_eq!(view.title, "3D View Unavailable");
        let text = view.to_string();
        assert!(text.contains("Dev Mode"));
        assert!(text.contains("no compatible graphics adapter"));
    }
}
