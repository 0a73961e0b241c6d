mod error;
mod types;

pub use error::*;
pub use types::*;

use std::ffi::CString;
use std::os::raw::c_char;

use amx_fftsum::bitsplit::bit_split_matmul;
use amx_fftsum::{FftsumConfig, FftsumPipeline};
use amx_tile::{AccTile, ByteTile, DotKind, EmulatedEngine, Matrix, TileEngine};

/// Execute a closure that returns an `AmxStatus`, catching any panics
/// and converting them into `AmxStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> AmxStatus + std::panic::UnwindSafe>(f: F) -> AmxStatus {
    match std::panic::catch_unwind(f) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            AmxStatus::ErrorInternal
        }
    }
}

/// Copy `len` elements from a caller buffer into a row-major matrix.
unsafe fn read_matrix<T: Copy + Default>(ptr: *const T, rows: usize, cols: usize) -> Option<Matrix<T>> {
    if ptr.is_null() {
        return None;
    }
    let data = std::slice::from_raw_parts(ptr, rows * cols).to_vec();
    Matrix::from_vec(data, rows, cols).ok()
}

fn run_dot_product(
    kind: DotKind,
    a: &Matrix<i8>,
    b: &Matrix<i8>,
    acc: &Matrix<i32>,
) -> amx_tile::Result<Matrix<i32>> {
    let src0 = ByteTile::load(a)?;
    let src1 = ByteTile::load(b)?;
    let mut dst = AccTile::load(acc)?;
    EmulatedEngine::new().dot_product(kind, &mut dst, &src0, &src1)?;
    Ok(dst.store())
}

/// Dot-product-accumulate on caller buffers.
///
/// - `a`: `m x 4k` bytes, row-major
/// - `b`: `k x 4n` bytes, already in tile (VNNI) layout
/// - `c`: `m x n` dwords; read as the initial accumulator and overwritten
///   with the result. Zero it first for a plain product.
#[no_mangle]
pub unsafe extern "C" fn amx_tile_dot_product(
    kind: AmxDotKind,
    m: usize,
    k: usize,
    n: usize,
    a: *const i8,
    b: *const i8,
    c: *mut i32,
) -> AmxStatus {
    catch_panic(|| {
        if c.is_null() {
            set_last_error("c is null".to_string());
            return AmxStatus::ErrorInvalidArgument;
        }
        let (a, b) = match unsafe { (read_matrix(a, m, 4 * k), read_matrix(b, k, 4 * n)) } {
            (Some(a), Some(b)) => (a, b),
            _ => {
                set_last_error("null operand".to_string());
                return AmxStatus::ErrorInvalidArgument;
            }
        };
        let acc = match unsafe { read_matrix(c as *const i32, m, n) } {
            Some(acc) => acc,
            None => {
                set_last_error("invalid accumulator".to_string());
                return AmxStatus::ErrorInvalidArgument;
            }
        };

        let result = match run_dot_product(kind.into(), &a, &b, &acc) {
            Ok(result) => result,
            Err(e) => {
                set_last_error(e.to_string());
                return (&e).into();
            }
        };

        let out = unsafe { std::slice::from_raw_parts_mut(c, m * n) };
        out.copy_from_slice(result.as_slice());
        AmxStatus::Ok
    })
}

/// Column sum of the Hadamard product of two `m x n` matrices.
///
/// `out` must hold `out_len >= n` dwords; the first `n` are written.
/// Nothing is written unless the call succeeds.
#[no_mangle]
pub unsafe extern "C" fn amx_hadamard_column_sum(
    fftout: *const i32,
    key: *const i32,
    m: usize,
    n: usize,
    range_check: AmxRangeCheck,
    out: *mut i32,
    out_len: usize,
) -> AmxStatus {
    catch_panic(|| {
        if out.is_null() || out_len < n {
            set_last_error(format!("output buffer too small: {} < {}", out_len, n));
            return AmxStatus::ErrorInvalidArgument;
        }
        let (fftout, key) = match unsafe { (read_matrix(fftout, m, n), read_matrix(key, m, n)) } {
            (Some(f), Some(k)) => (f, k),
            _ => {
                set_last_error("null operand".to_string());
                return AmxStatus::ErrorInvalidArgument;
            }
        };

        let config = FftsumConfig::with_dims(m, n).with_range_check(range_check.into());
        let result = FftsumPipeline::new(config)
            .and_then(|pipeline| pipeline.hadamard_column_sum(&fftout, &key));
        match result {
            Ok(sums) => {
                let out = unsafe { std::slice::from_raw_parts_mut(out, n) };
                out.copy_from_slice(&sums);
                AmxStatus::Ok
            }
            Err(e) => {
                set_last_error(e.to_string());
                (&e).into()
            }
        }
    })
}

/// 9-bit matrix product via four unsigned tile products.
///
/// - `src1`: `m x 4k` values in `0..=511`
/// - `src2`: `4k x n` values in `0..=511`
/// - `res`: `m x n` output
#[no_mangle]
pub unsafe extern "C" fn amx_bit_split_matmul(
    src1: *const u16,
    src2: *const u16,
    res: *mut u32,
    m: usize,
    k: usize,
    n: usize,
) -> AmxStatus {
    catch_panic(|| {
        if res.is_null() {
            set_last_error("res is null".to_string());
            return AmxStatus::ErrorInvalidArgument;
        }
        let (a, b) = match unsafe { (read_matrix(src1, m, 4 * k), read_matrix(src2, 4 * k, n)) } {
            (Some(a), Some(b)) => (a, b),
            _ => {
                set_last_error("null operand".to_string());
                return AmxStatus::ErrorInvalidArgument;
            }
        };
        match bit_split_matmul(&a, &b, &EmulatedEngine::new()) {
            Ok(product) => {
                let out = unsafe { std::slice::from_raw_parts_mut(res, m * n) };
                out.copy_from_slice(product.as_slice());
                AmxStatus::Ok
            }
            Err(e) => {
                set_last_error(e.to_string());
                (&e).into()
            }
        }
    })
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned string
/// with `amx_free_string`.
#[no_mangle]
pub extern "C" fn amx_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `amx_last_error`.
#[no_mangle]
pub unsafe extern "C" fn amx_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    fn last_error_message() -> Option<String> {
        let ptr = amx_last_error();
        if ptr.is_null() {
            return None;
        }
        let msg = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        unsafe { amx_free_string(ptr as *mut c_char) };
        Some(msg)
    }

    fn strict_column_sum(f: *const i32, k: *const i32, m: usize, n: usize, out: &mut [i32]) -> AmxStatus {
        unsafe { amx_hadamard_column_sum(f, k, m, n, AmxRangeCheck::Strict, out.as_mut_ptr(), out.len()) }
    }

    #[test]
    fn test_dot_product_accumulates() {
        let a = vec![2i8; 16 * 64];
        let b = vec![2i8; 16 * 64];
        let mut c = vec![1i32; 16 * 16];
        let status = unsafe {
            amx_tile_dot_product(
                AmxDotKind::Ssd,
                16,
                16,
                16,
                a.as_ptr(),
                b.as_ptr(),
                c.as_mut_ptr(),
            )
        };
        assert_eq!(status, AmxStatus::Ok);
        assert!(c.iter().all(|&v| v == 257));
    }

    #[test]
    fn test_dot_product_too_large() {
        let a = vec![0i8; 17 * 64];
        let b = vec![0i8; 16 * 64];
        let mut c = vec![0i32; 17 * 16];
        let status = unsafe {
            amx_tile_dot_product(
                AmxDotKind::Uud,
                17,
                16,
                16,
                a.as_ptr(),
                b.as_ptr(),
                c.as_mut_ptr(),
            )
        };
        assert_eq!(status, AmxStatus::ErrorDimensionTooLarge);
        assert!(last_error_message().unwrap().contains("dimension too large"));
    }

    #[test]
    fn test_hadamard_column_sum() {
        let f = vec![3i32; 32 * 64];
        let k = vec![-2i32; 32 * 64];
        let mut out = vec![0i32; 64];
        let status = strict_column_sum(f.as_ptr(), k.as_ptr(), 32, 64, &mut out);
        assert_eq!(status, AmxStatus::Ok);
        assert_eq!(out, vec![-192; 64]);
    }

    #[test]
    fn test_hadamard_column_sum_errors_leave_output() {
        let f = vec![300i32; 32 * 64];
        let mut out = vec![7i32; 64];
        let status = strict_column_sum(f.as_ptr(), f.as_ptr(), 32, 64, &mut out);
        assert_eq!(status, AmxStatus::ErrorOutOfRange);
        assert_eq!(out, vec![7; 64]);

        let g = vec![0i32; 30 * 64];
        let status = strict_column_sum(g.as_ptr(), g.as_ptr(), 30, 64, &mut out);
        assert_eq!(status, AmxStatus::ErrorShapeMismatch);

        let status = strict_column_sum(std::ptr::null(), f.as_ptr(), 32, 64, &mut out);
        assert_eq!(status, AmxStatus::ErrorInvalidArgument);
    }

    #[test]
    fn test_bit_split_matmul() {
        let a = vec![256u16; 16 * 64];
        let b = vec![3u16; 64 * 16];
        let mut res = vec![0u32; 16 * 16];
        let status =
            unsafe { amx_bit_split_matmul(a.as_ptr(), b.as_ptr(), res.as_mut_ptr(), 16, 16, 16) };
        assert_eq!(status, AmxStatus::Ok);
        assert!(res.iter().all(|&v| v == 64 * 256 * 3));
    }

    #[test]
    fn test_no_error_by_default() {
        let _ = last_error_message();
        assert!(last_error_message().is_none());
    }
}
