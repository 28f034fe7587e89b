use crate::engine::{NativeHandle, PlaybackEngine};
use raw_window_handle::RawWindowHandle;
use std::fmt::Debug;
use std::sync::Arc;

/// A native surface the engine can draw video into.
pub trait VideoOutput: Debug + Send + Sync {
    fn handle(&self) -> NativeHandle;

    /// Points the engine's video output at this surface.
    fn attach(&self, engine: &mut dyn PlaybackEngine) {
        let handle = self.handle();
        log::debug!("binding video output to {handle:?}");
        engine.set_video_output(handle);
    }
}

/// Win32 window, identified by its `HWND`.
#[derive(Debug, Clone, Copy)]
pub struct Win32Output {
    hwnd: isize,
}

impl VideoOutput for Win32Output {
    fn handle(&self) -> NativeHandle {
        NativeHandle::Hwnd(self.hwnd)
    }
}

/// X11 window id. Other non-Windows hosts hand their native view through the
/// same path.
#[derive(Debug, Clone, Copy)]
pub struct X11Output {
    xid: u64,
}

impl VideoOutput for X11Output {
    fn handle(&self) -> NativeHandle {
        NativeHandle::XWindow(self.xid)
    }
}

/// Selects the video output implementation for the host platform.
///
/// Returns `None` for window systems the engine cannot embed into, in which
/// case video is left to the engine's own window.
#[cfg(target_os = "windows")]
pub fn platform_output(raw: RawWindowHandle) -> Option<Arc<dyn VideoOutput>> {
    match raw {
        RawWindowHandle::Win32(handle) => Some(Arc::new(Win32Output {
            hwnd: handle.hwnd.get(),
        })),
        other => {
            log::warn!("unsupported window handle for video output: {other:?}");
            None
        }
    }
}

/// Selects the video output implementation for the host platform.
///
/// Returns `None` for window systems the engine cannot embed into, in which
/// case video is left to the engine's own window.
#[cfg(not(target_os = "windows"))]
pub fn platform_output(raw: RawWindowHandle) -> Option<Arc<dyn VideoOutput>> {
    let xid = match raw {
        RawWindowHandle::Xlib(handle) => handle.window as u64,
        RawWindowHandle::Xcb(handle) => handle.window.get() as u64,
        RawWindowHandle::AppKit(handle) => handle.ns_view.as_ptr() as usize as u64,
        other => {
            log::warn!("unsupported window handle for video output: {other:?}");
            return None;
        }
    };
    Some(Arc::new(X11Output { xid }))
}
