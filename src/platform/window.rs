//! Layered overlay window host surface
//!
//! Win32 implementation of the host surface seam. Each insertion creates a
//! topmost, non-activating layered popup covering the desktop work area and
//! presents one premultiplied frame through `UpdateLayeredWindow`; removal
//! destroys the window. The window deliberately omits `WS_EX_TRANSPARENT`
//! so the busy surface blocks clicks on the content beneath it.

use std::ffi::c_void;
use std::slice;
use std::sync::Once;

use tiny_skia::Pixmap;
use windows::Win32::Foundation::{COLORREF, HWND, LPARAM, LRESULT, POINT, RECT, SIZE, WPARAM};
use windows::Win32::Graphics::Gdi::{
    AC_SRC_ALPHA, AC_SRC_OVER, BI_RGB, BITMAPINFO, BITMAPINFOHEADER, BLENDFUNCTION,
    CreateCompatibleDC, CreateDIBSection, DIB_RGB_COLORS, DeleteDC, DeleteObject, GetDC, HGDIOBJ,
    ReleaseDC, SelectObject,
};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DestroyWindow, RegisterClassW, SPI_GETWORKAREA,
    SW_SHOWNOACTIVATE, SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS, ShowWindow, SystemParametersInfoW,
    ULW_ALPHA, UpdateLayeredWindow, WM_DESTROY, WNDCLASSW, WS_EX_LAYERED, WS_EX_NOACTIVATE,
    WS_EX_TOOLWINDOW, WS_EX_TOPMOST, WS_POPUP,
};
use windows::core::{PCWSTR, w};

use crate::domain::content::OverlayContent;
use crate::host::{HostSurface, SurfaceError, SurfaceHandle};
use crate::platform::render::{FramePainter, RenderError};

/// Win32 host surface errors
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("failed to query the desktop work area")]
    WorkAreaUnavailable,

    #[error("failed to resolve the module handle")]
    ModuleHandleUnavailable,

    #[error("failed to create overlay window")]
    WindowCreationFailed,

    #[error("failed to acquire screen device context")]
    DeviceContextFailed,

    #[error("failed to create memory device context")]
    MemoryDeviceContextFailed,

    #[error("failed to create DIB section for overlay frame")]
    DibSectionCreationFailed,

    #[error("failed to select bitmap into memory DC")]
    BitmapSelectionFailed,

    #[error("failed to update layered window surface")]
    LayerUpdateFailed,

    #[error("rendering failed: {0}")]
    Rendering(#[from] RenderError),
}

impl From<PlatformError> for SurfaceError {
    // Platform failures only occur on the insertion path; removal maps
    // its single failure mode directly.
    fn from(err: PlatformError) -> Self {
        SurfaceError::InsertFailed {
            reason: err.to_string(),
        }
    }
}

/// Host surface backed by a Win32 layered window
pub struct LayeredSurface {
    painter: FramePainter,
}

impl LayeredSurface {
    pub fn new() -> Self {
        Self {
            painter: FramePainter::new(),
        }
    }

    fn work_area() -> Result<RECT, PlatformError> {
        let mut rect = RECT::default();
        let result = unsafe {
            SystemParametersInfoW(
                SPI_GETWORKAREA,
                0,
                Some(&mut rect as *mut _ as *mut c_void),
                SYSTEM_PARAMETERS_INFO_UPDATE_FLAGS(0),
            )
        };
        if result.is_err() {
            return Err(PlatformError::WorkAreaUnavailable);
        }
        Ok(rect)
    }

    fn register_window_class(class_name: PCWSTR) -> Result<(), PlatformError> {
        unsafe extern "system" fn surface_window_proc(
            hwnd: HWND,
            msg: u32,
            wparam: WPARAM,
            lparam: LPARAM,
        ) -> LRESULT {
            match msg {
                WM_DESTROY => LRESULT(0),
                _ => unsafe { DefWindowProcW(hwnd, msg, wparam, lparam) },
            }
        }

        static REGISTER: Once = Once::new();
        let mut outcome = Ok(());

        REGISTER.call_once(|| {
            let hinstance = match unsafe { GetModuleHandleW(None) } {
                Ok(handle) => handle,
                Err(_) => {
                    outcome = Err(PlatformError::ModuleHandleUnavailable);
                    return;
                }
            };

            let wc = WNDCLASSW {
                lpfnWndProc: Some(surface_window_proc),
                hInstance: hinstance.into(),
                lpszClassName: class_name,
                ..Default::default()
            };

            // A zero atom means registration failed; an already-registered
            // class cannot happen under Once.
            if unsafe { RegisterClassW(&wc) } == 0 {
                outcome = Err(PlatformError::WindowCreationFailed);
            }
        });

        outcome
    }

    fn create_window(class_name: PCWSTR, work_area: &RECT) -> Result<HWND, PlatformError> {
        let hinstance = unsafe { GetModuleHandleW(None) }
            .map_err(|_| PlatformError::ModuleHandleUnavailable)?;

        let hwnd = unsafe {
            CreateWindowExW(
                WS_EX_LAYERED | WS_EX_TOPMOST | WS_EX_NOACTIVATE | WS_EX_TOOLWINDOW,
                class_name,
                w!("busyveil overlay"),
                WS_POPUP,
                work_area.left,
                work_area.top,
                work_area.right - work_area.left,
                work_area.bottom - work_area.top,
                None,
                None,
                hinstance,
                None,
            )
        };

        if hwnd.0 == 0 {
            return Err(PlatformError::WindowCreationFailed);
        }

        Ok(hwnd)
    }

    /// Presents the frame via `UpdateLayeredWindow`
    ///
    /// The pixmap is premultiplied RGBA; the DIB wants premultiplied BGRA,
    /// so the copy swizzles the red and blue channels.
    fn present(hwnd: HWND, pixmap: &Pixmap, origin: POINT) -> Result<(), PlatformError> {
        let width = pixmap.width() as i32;
        let height = pixmap.height() as i32;

        unsafe {
            let screen_dc = GetDC(HWND(0));
            if screen_dc.0 == 0 {
                return Err(PlatformError::DeviceContextFailed);
            }

            let memory_dc = CreateCompatibleDC(screen_dc);
            if memory_dc.0 == 0 {
                ReleaseDC(HWND(0), screen_dc);
                return Err(PlatformError::MemoryDeviceContextFailed);
            }

            let mut bitmap_info = BITMAPINFO::default();
            bitmap_info.bmiHeader = BITMAPINFOHEADER {
                biSize: std::mem::size_of::<BITMAPINFOHEADER>() as u32,
                biWidth: width,
                biHeight: -height, // top-down bitmap so rows copy directly
                biPlanes: 1,
                biBitCount: 32,
                biCompression: BI_RGB.0,
                ..Default::default()
            };

            let mut pixel_ptr: *mut c_void = std::ptr::null_mut();
            let dib = match CreateDIBSection(
                memory_dc,
                &bitmap_info,
                DIB_RGB_COLORS,
                &mut pixel_ptr,
                None,
                0,
            ) {
                Ok(bitmap) => bitmap,
                Err(_) => {
                    DeleteDC(memory_dc);
                    ReleaseDC(HWND(0), screen_dc);
                    return Err(PlatformError::DibSectionCreationFailed);
                }
            };

            let dib_object: HGDIOBJ = dib.into();

            if pixel_ptr.is_null() {
                DeleteObject(dib_object);
                DeleteDC(memory_dc);
                ReleaseDC(HWND(0), screen_dc);
                return Err(PlatformError::DibSectionCreationFailed);
            }

            {
                let src = pixmap.data();
                let dst = slice::from_raw_parts_mut(pixel_ptr as *mut u8, src.len());
                for (dst_px, src_px) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                    dst_px[0] = src_px[2];
                    dst_px[1] = src_px[1];
                    dst_px[2] = src_px[0];
                    dst_px[3] = src_px[3];
                }
            }

            let old_bitmap = SelectObject(memory_dc, dib_object);
            if old_bitmap.0 == 0 {
                DeleteObject(dib_object);
                DeleteDC(memory_dc);
                ReleaseDC(HWND(0), screen_dc);
                return Err(PlatformError::BitmapSelectionFailed);
            }

            let size = SIZE {
                cx: width,
                cy: height,
            };
            let src_point = POINT { x: 0, y: 0 };
            let blend = BLENDFUNCTION {
                BlendOp: AC_SRC_OVER as u8,
                BlendFlags: 0,
                SourceConstantAlpha: 255,
                AlphaFormat: AC_SRC_ALPHA as u8,
            };

            let update_result = UpdateLayeredWindow(
                hwnd,
                screen_dc,
                Some(&origin),
                Some(&size),
                memory_dc,
                Some(&src_point),
                COLORREF(0),
                Some(&blend),
                ULW_ALPHA,
            );

            SelectObject(memory_dc, old_bitmap);
            DeleteObject(dib_object);
            DeleteDC(memory_dc);
            ReleaseDC(HWND(0), screen_dc);

            if update_result.is_err() {
                return Err(PlatformError::LayerUpdateFailed);
            }
        }

        Ok(())
    }
}

impl Default for LayeredSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl HostSurface for LayeredSurface {
    fn insert(&self, content: &OverlayContent) -> Result<Box<dyn SurfaceHandle>, SurfaceError> {
        let class_name = w!("BusyveilOverlayWindow");
        Self::register_window_class(class_name)?;

        let work_area = Self::work_area()?;
        let width = (work_area.right - work_area.left).max(1) as u32;
        let height = (work_area.bottom - work_area.top).max(1) as u32;

        let pixmap = self
            .painter
            .render(content, width, height)
            .map_err(PlatformError::from)?;

        let hwnd = Self::create_window(class_name, &work_area)?;
        let origin = POINT {
            x: work_area.left,
            y: work_area.top,
        };

        if let Err(err) = Self::present(hwnd, &pixmap, origin) {
            unsafe {
                let _ = DestroyWindow(hwnd);
            }
            return Err(err.into());
        }

        unsafe {
            ShowWindow(hwnd, SW_SHOWNOACTIVATE);
        }

        Ok(Box::new(LayeredHandle {
            hwnd,
            detached: false,
        }))
    }
}

/// Handle to one live layered overlay window
///
/// The window must be removed on the thread that inserted it; the
/// coordinator's single-UI-thread model guarantees that.
pub struct LayeredHandle {
    hwnd: HWND,
    detached: bool,
}

impl SurfaceHandle for LayeredHandle {
    fn remove(&mut self) -> Result<(), SurfaceError> {
        if self.detached {
            return Ok(());
        }
        self.detached = true;

        unsafe { DestroyWindow(self.hwnd) }.map_err(|err| SurfaceError::RemoveFailed {
            reason: err.to_string(),
        })
    }
}

impl Drop for LayeredHandle {
    fn drop(&mut self) {
        if !self.detached {
            unsafe {
                let _ = DestroyWindow(self.hwnd);
            }
        }
    }
}
