use std::env;
use std::fs;
use std::path::Path;

// Stages the panel assets from ui/ into OUT_DIR so rust-embed can pick
// them up. Release builds minify the HTML (inline CSS/JS included).
fn main() {
    println!("cargo:rerun-if-changed=ui/");

    let out_dir = env::var("OUT_DIR").unwrap();
    let dest = Path::new(&out_dir).join("ui");
    let src = Path::new("ui");

    if dest.exists() {
        fs::remove_dir_all(&dest).unwrap();
    }
    fs::create_dir_all(&dest).unwrap();

    if !src.exists() {
        return;
    }

    let minify = env::var("PROFILE").unwrap() == "release";

    for entry in fs::read_dir(src).unwrap() {
        let path = entry.unwrap().path();
        if !path.is_file() {
            continue;
        }
        let dest_file = dest.join(path.file_name().unwrap());

        if minify && path.extension().is_some_and(|e| e == "html") {
            let source = fs::read(&path).unwrap();
            let mut cfg = minify_html::Cfg::new();
            cfg.minify_css = true;
            cfg.minify_js = true;
            cfg.keep_comments = false;
            fs::write(&dest_file, minify_html::minify(&source, &cfg)).unwrap();
        } else {
            fs::copy(&path, &dest_file).unwrap();
        }
    }
}
