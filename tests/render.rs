// Tests against system fonts
//
// Machines without any installed fonts (e.g. minimal CI images) cannot run
// the interesting parts; each test skips itself when resolution fails.

use ui_text::fonts::{FontLibrary, FontSelector};
use ui_text::Renderer;

#[test]
fn locate_load_round_trip() {
    let mut lib = FontLibrary::with_system_fonts();
    let sel = FontSelector::new();
    let info = match lib.locate(&sel) {
        Ok(info) => info,
        Err(_) => {
            eprintln!("skipping: no system fonts found");
            return;
        }
    };

    // A located path must be loadable:
    assert!(info.path.exists());
    let id = lib.load_face(&info).unwrap();
    assert!(lib.face_covers(id, 'A'));

    // Repeated loads return the same face without growing the library:
    let len = lib.len();
    assert_eq!(lib.load_face(&info).unwrap(), id);
    assert_eq!(lib.len(), len);
}

#[test]
fn scaled_metrics() {
    let mut lib = FontLibrary::with_system_fonts();
    let info = match lib.locate(&FontSelector::new()) {
        Ok(info) => info,
        Err(_) => {
            eprintln!("skipping: no system fonts found");
            return;
        }
    };
    let id = lib.load_face(&info).unwrap();
    let face = lib.get_face(id);
    let sf = face.scale_by_dpem(16.0);

    assert!(sf.ascent() > 0.0);
    assert!(sf.descent() <= 0.0);
    assert!(sf.h_advance(face.glyph_index('M')) > 0.0);
    if let Some(underline) = sf.underline_metrics() {
        assert!(underline.thickness > 0.0);
    }
}

#[test]
fn fallback_covers_char() {
    let mut lib = FontLibrary::with_system_fonts();
    let sel = FontSelector::new();
    if lib.locate(&sel).is_err() {
        eprintln!("skipping: no system fonts found");
        return;
    }

    if let Ok(id) = lib.fallback_for_char('A', &sel, false) {
        assert!(lib.face_covers(id, 'A'));
    }
}

#[test]
fn render_draws_text() {
    let mut renderer = Renderer::new();
    renderer.set_main_family("sans-serif", false, false);

    let (width, height) = (120, 24);
    let mut buf = vec![0u8; width * height * 4];
    match renderer.render_line(
        "Hello", 16, 0xFFFFFF, 0x000000, &mut buf, width, height, 2.0, 0.0,
    ) {
        Err(_) => eprintln!("skipping: no system fonts found"),
        Ok(()) => {
            // Background fill sets alpha everywhere:
            assert!(buf.chunks_exact(4).all(|px| px[3] == 255));
            // Some glyph coverage ended up in the buffer:
            assert!(buf.chunks_exact(4).any(|px| px[0] > 128));
        }
    }
}

#[test]
fn render_negative_offsets_small_size() {
    let mut renderer = Renderer::new();

    // Sub-pixel positioning is active below the size threshold; negative
    // offsets must wrap the fractional position rather than panic.
    let (width, height) = (64, 16);
    let mut buf = vec![0u8; width * height * 4];
    match renderer.render_line("Hi", 12, 0xFFFFFF, 0x000000, &mut buf, width, height, -0.5, -1.25)
    {
        Err(_) => eprintln!("skipping: no system fonts found"),
        Ok(()) => assert!(buf.chunks_exact(4).all(|px| px[3] == 255)),
    }
}

#[test]
fn render_clips_long_text() {
    let mut renderer = Renderer::new();

    let (width, height) = (16, 16);
    let mut buf = vec![0u8; width * height * 4];
    let text = "The quick brown fox jumps over the lazy dog";
    match renderer.render_line(text, 14, 0xFFFFFF, 0x000000, &mut buf, width, height, 0.0, 0.0) {
        Err(_) => eprintln!("skipping: no system fonts found"),
        Ok(()) => assert_eq!(buf.len(), width * height * 4),
    }
}

#[test]
fn bold_and_regular_resolve_separately() {
    let lib = FontLibrary::with_system_fonts();
    let regular = lib.locate(&FontSelector::from_family("", false, false));
    let bold = lib.locate(&FontSelector::from_family("", true, false));
    match (regular, bold) {
        (Ok(regular), Ok(bold)) => {
            // Styled variants usually live in separate files or indices; at
            // minimum both requests must resolve to loadable faces.
            assert!(regular.path.exists());
            assert!(bold.path.exists());
        }
        _ => eprintln!("skipping: no system fonts found"),
    }
}
