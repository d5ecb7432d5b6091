// Copyright (c) 2025 Redglyph (@gmail.com). All Rights Reserved.

fn main() {
    let code = classlr_bin::run(std::env::args_os(), &mut std::io::stdout(), &mut std::io::stderr());
    std::process::exit(code);
}
