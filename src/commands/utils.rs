use crate::utils::config::PROFILE_VERSION;

/// Display schema information
pub fn display_schema(show_details: bool) {
    println!("binprof YAML Profile Format");
    println!("Current Version: {}", PROFILE_VERSION);
    println!();

    if show_details {
        println!("Format Structure:");
        println!("  header:");
        println!("    profile-version: number - Format version");
        println!("    binary-name: string     - File name of the profiled binary");
        println!("    binary-build-id: string - Build id or '<unknown>'");
        println!("    profile-flags: number   - 1 = branch records, 2 = sampled events, 4 = memory events");
        println!("    profile-origin: string  - Reader the profile came from");
        println!("    profile-events: string  - Comma-separated event names");
        println!("  functions: array");
        println!("    name: string            - Function name");
        println!("    fid: number             - Function id");
        println!("    hash: string            - Structural hash (depth-first order), quoted '0x%016X'");
        println!("    exec: number            - Entry execution count");
        println!("    nblocks: number         - Number of basic blocks");
        println!("    blocks: array");
        println!("      bid: number           - Block index");
        println!("      insns: number         - Instruction count");
        println!("      exec: number?         - Execution count (branch profiles)");
        println!("      events: number?       - Event count (event-count profiles)");
        println!("      calls: array?         - off, fid, disc?, cnt, mis?");
        println!("      succ: array?          - bid, cnt, mis?");
    } else {
        println!("Use --show for detailed format information");
    }
}

/// Display version information
pub fn display_version() {
    println!("binprof v{}", env!("CARGO_PKG_VERSION"));
    println!("Profile Format: v{}", PROFILE_VERSION);
    println!();
    println!("Deterministic YAML encoding of basic-block execution profiles.");
}
