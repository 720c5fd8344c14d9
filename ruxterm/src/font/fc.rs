//! fontconfig face discovery.
//!
//! One small wrapper around `FcFontSort`: given a family and a style,
//! produce the ordered list of font files to try. The first match is the
//! primary face, the rest form the fallback chain.

use std::ffi::{CStr, CString};
use std::os::raw::{c_char, c_int};
use std::path::PathBuf;
use std::ptr;
use std::sync::Once;

use fontconfig::fontconfig as ffi;

// Object and value constants from fontconfig.h; the ABI has kept these
// stable for two decades.
const FC_FAMILY: &[u8] = b"family\0";
const FC_FILE: &[u8] = b"file\0";
const FC_WEIGHT: &[u8] = b"weight\0";
const FC_SLANT: &[u8] = b"slant\0";

const FC_WEIGHT_REGULAR: c_int = 80;
const FC_WEIGHT_BOLD: c_int = 200;
const FC_SLANT_ROMAN: c_int = 0;
const FC_SLANT_ITALIC: c_int = 100;

static FC_INIT: Once = Once::new();

/// Query fontconfig for the sorted list of font files covering `family`
/// at the given weight/slant. Returns an empty list when nothing matches
/// (the caller decides whether that is fatal).
pub fn sorted_font_paths(family: &str, bold: bool, italic: bool) -> Vec<PathBuf> {
    FC_INIT.call_once(|| unsafe {
        ffi::FcInit();
    });

    let Ok(family) = CString::new(family) else {
        return Vec::new();
    };
    let weight = if bold { FC_WEIGHT_BOLD } else { FC_WEIGHT_REGULAR };
    let slant = if italic { FC_SLANT_ITALIC } else { FC_SLANT_ROMAN };

    let mut paths = Vec::new();

    // SAFETY: the pattern and font set are created and destroyed locally;
    // every pointer handed to fontconfig outlives the call that uses it.
    unsafe {
        let pattern = ffi::FcPatternCreate();
        if pattern.is_null() {
            return paths;
        }

        ffi::FcPatternAddString(
            pattern,
            FC_FAMILY.as_ptr().cast::<c_char>(),
            family.as_ptr().cast(),
        );
        ffi::FcPatternAddInteger(pattern, FC_WEIGHT.as_ptr().cast::<c_char>(), weight);
        ffi::FcPatternAddInteger(pattern, FC_SLANT.as_ptr().cast::<c_char>(), slant);

        ffi::FcConfigSubstitute(ptr::null_mut(), pattern, ffi::FcMatchPattern);
        ffi::FcDefaultSubstitute(pattern);

        let mut result = ffi::FcResultMatch;
        let set = ffi::FcFontSort(ptr::null_mut(), pattern, 1, ptr::null_mut(), &mut result);

        if !set.is_null() {
            let nfont = (*set).nfont as isize;
            for i in 0..nfont {
                let font = *(*set).fonts.offset(i);
                let mut file: *mut u8 = ptr::null_mut();
                let res = ffi::FcPatternGetString(
                    font,
                    FC_FILE.as_ptr().cast::<c_char>(),
                    0,
                    &mut file,
                );
                if res == ffi::FcResultMatch && !file.is_null() {
                    let path = CStr::from_ptr(file.cast::<c_char>());
                    paths.push(PathBuf::from(path.to_string_lossy().into_owned()));
                }
            }
            ffi::FcFontSetDestroy(set);
        }

        ffi::FcPatternDestroy(pattern);
    }

    paths
}
