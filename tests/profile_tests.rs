use binprof::binary::{
    BasicBlock, BinaryContext, BinaryFunction, IndirectCallProfile, Instruction, InstructionKind, ProfileFlags,
    ProfileReader,
};
use binprof::output::{profile_to_string, write_profile};
use binprof::profile::{build_profile, CallSiteInfo, SuccessorInfo};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn instr(opcode: &str) -> Instruction {
    Instruction::new(opcode, InstructionKind::Other)
}

fn callee(name: &str, id: u32, address: u64) -> BinaryFunction {
    BinaryFunction::new(name, id, address, vec![BasicBlock::new(0, vec![instr("retq")])])
}

/// F calls G once per iteration; G itself has no profile
fn scenario_a() -> BinaryContext {
    let f = BinaryFunction::new(
        "F",
        1,
        0x1000,
        vec![
            BasicBlock::new(
                0,
                vec![
                    instr("pushq"),
                    Instruction::new("callq", InstructionKind::Call)
                        .with_offset(4)
                        .with_target("G")
                        .with_count(5),
                ],
            )
            .with_execution_count(5)
            .with_successor(1, 5, 0),
            BasicBlock::new(9, vec![instr("retq")]),
        ],
    )
    .with_profile(ProfileFlags::LBR, 5);

    BinaryContext::new("a.out", None, vec![f, callee("G", 2, 0x2000)]).unwrap()
}

#[test]
fn test_scenario_a_direct_call() {
    let profile = build_profile(&scenario_a(), &ProfileReader::new("branch reader"));

    assert_eq!(profile.functions.len(), 1);
    let f = &profile.functions[0];
    assert_eq!(f.name, "F");
    assert_eq!(f.blocks.len(), 1);

    let block = &f.blocks[0];
    assert_eq!(block.index, 0);
    assert_eq!(block.num_instructions, 2);
    assert_eq!(
        block.call_sites,
        vec![CallSiteInfo {
            offset: 4,
            dest_id: 2,
            entry_discriminator: 0,
            count: 5,
            mispreds: 0,
        }]
    );
    assert_eq!(
        block.successors,
        vec![SuccessorInfo {
            index: 1,
            count: 5,
            mispreds: 0,
        }]
    );
}

#[test]
fn test_scenario_b_cold_event_block() {
    let f = BinaryFunction::new(
        "F",
        1,
        0x1000,
        vec![BasicBlock::new(0, vec![instr("retq")]).with_execution_count(0)],
    )
    .with_profile(ProfileFlags::SAMPLE, 0);
    let ctx = BinaryContext::new("a.out", None, vec![f]).unwrap();

    let profile = build_profile(&ctx, &ProfileReader::new("perf"));

    assert_eq!(profile.functions.len(), 1);
    assert!(profile.functions[0].blocks.is_empty());
    assert_eq!(profile.header.flags, ProfileFlags::SAMPLE.bits());
}

#[test]
fn test_scenario_c_indirect_call_targets() {
    let f = BinaryFunction::new(
        "F",
        1,
        0x1000,
        vec![BasicBlock::new(
            0x100,
            vec![Instruction::new("callq", InstructionKind::IndirectCall)
                .with_offset(0x102)
                .with_call_profile(vec![
                    IndirectCallProfile::new(Some("H"), 0, 0),
                    IndirectCallProfile::new(Some("libc_handler"), 3, 1),
                ])],
        )
        .with_execution_count(3)],
    )
    .with_profile(ProfileFlags::LBR, 3);
    let ctx = BinaryContext::new("a.out", None, vec![f, callee("H", 8, 0x8000)]).unwrap();

    let profile = build_profile(&ctx, &ProfileReader::new("perf"));
    let sites = &profile.functions[0].blocks[0].call_sites;

    let dest_ids: Vec<_> = sites.iter().map(|cs| cs.dest_id).collect();
    assert_eq!(dest_ids, vec![0, 8]);
    assert!(sites.iter().all(|cs| cs.offset == 2));
    assert_eq!(sites[1].count, 0);
}

#[test]
fn test_output_is_deterministic() {
    let ctx = scenario_a();
    let source = ProfileReader::new("branch reader").with_events(["cycles"]);

    let first = NamedTempFile::new().unwrap();
    let second = NamedTempFile::new().unwrap();
    write_profile(&ctx, &source, first.path()).unwrap();
    write_profile(&ctx, &source, second.path()).unwrap();

    let first = std::fs::read(first.path()).unwrap();
    let second = std::fs::read(second.path()).unwrap();
    assert_eq!(first, second);

    let in_memory = profile_to_string(&build_profile(&ctx, &source)).unwrap();
    assert_eq!(in_memory.as_bytes(), first.as_slice());
}

#[test]
fn test_untrusted_unvalidated_functions_are_skipped() {
    let mut unvalidated = BinaryFunction::new(
        "stale",
        3,
        0x3000,
        vec![BasicBlock::new(0, vec![instr("retq")]).with_execution_count(1)],
    )
    .with_profile(ProfileFlags::LBR, 1);
    unvalidated.has_valid_profile = false;

    let ctx = BinaryContext::new("a.out", None, vec![unvalidated]).unwrap();

    let untrusted = build_profile(&ctx, &ProfileReader::new("perf"));
    assert!(untrusted.functions.is_empty());
    // The flags still come from the function
    assert_eq!(untrusted.header.flags, 1);

    let trusted = build_profile(&ctx, &ProfileReader::new("perf").trusted());
    assert_eq!(trusted.functions.len(), 1);
}

#[test]
fn test_functions_written_in_address_order() {
    let profiled = |name: &str, id: u32, address: u64| {
        BinaryFunction::new(
            name,
            id,
            address,
            vec![BasicBlock::new(0, vec![instr("retq")]).with_execution_count(1)],
        )
        .with_profile(ProfileFlags::SAMPLE, 1)
    };
    let ctx = BinaryContext::new(
        "a.out",
        None,
        vec![profiled("c", 3, 0x3000), profiled("a", 9, 0x1000), profiled("b", 1, 0x2000)],
    )
    .unwrap();

    let profile = build_profile(&ctx, &ProfileReader::new("perf"));
    let names: Vec<_> = profile.functions.iter().map(|f| f.name.as_str()).collect();

    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_event_mode_partition() {
    let f = BinaryFunction::new(
        "F",
        1,
        0x1000,
        vec![
            BasicBlock::new(
                0,
                vec![Instruction::new("callq", InstructionKind::Call)
                    .with_offset(0)
                    .with_target("G")
                    .with_count(4)],
            )
            .with_execution_count(4)
            .with_successor(1, 4, 0),
            BasicBlock::new(5, vec![instr("retq")]).with_execution_count(4),
        ],
    )
    .with_profile(ProfileFlags::SAMPLE, 4);
    let ctx = BinaryContext::new("a.out", None, vec![f, callee("G", 2, 0x2000)]).unwrap();

    let profile = build_profile(&ctx, &ProfileReader::new("perf"));
    let blocks = &profile.functions[0].blocks;

    assert_eq!(blocks.len(), 2);
    assert!(blocks.iter().all(|b| b.call_sites.is_empty() && b.successors.is_empty()));
    assert!(blocks.iter().all(|b| b.exec_count.is_none() && b.event_count == Some(4)));

    let yaml = profile_to_string(&profile).unwrap();
    assert!(!yaml.contains("calls:"));
    assert!(!yaml.contains("succ:"));
}

#[test]
#[should_panic(expected = "consistent profile flags")]
fn test_mixed_profile_modes_are_fatal() {
    let a = BinaryFunction::new("a", 1, 0x1000, vec![BasicBlock::new(0, vec![])]).with_profile(ProfileFlags::LBR, 1);
    let b = BinaryFunction::new("b", 2, 0x2000, vec![BasicBlock::new(0, vec![])])
        .with_profile(ProfileFlags::SAMPLE, 1);
    let ctx = BinaryContext::new("a.out", None, vec![a, b]).unwrap();

    build_profile(&ctx, &ProfileReader::new("perf"));
}
