use bootsmith_asm::{Instruction, Program, boot};
use pretty_assertions::assert_eq;

/// Where a short branch at `at` lands
fn branch_target(code: &[u8], at: usize) -> usize {
    (at as isize + 2 + code[at + 1] as i8 as isize) as usize
}

#[test]
fn branches_land_on_their_labels_for_every_offset() {
    let len = boot::teletype_program(0).encoded_len();
    for offset in len as u16..510 {
        let code = boot::assemble_boot_code(offset).unwrap();
        assert_eq!(code.len(), len);

        let (print, jz, hlt) = (22, 25, len - 3);
        assert_eq!(code[print], 0xAC, "print loop starts with lodsb");
        assert_eq!(code[jz], 0x74);
        assert_eq!(code[hlt], 0xF4);
        assert_eq!(branch_target(&code, jz), hlt);
        assert_eq!(branch_target(&code, hlt - 2), print);
        assert_eq!(branch_target(&code, hlt + 1), hlt);
    }
}

#[test]
fn program_listing() {
    let program = boot::teletype_program(0x2A);
    let listing: Vec<String> = program.instructions().map(|i| i.to_string()).collect();
    assert_eq!(listing.first().map(String::as_str), Some("cli"));
    assert!(listing.contains(&"mov si, 0x7c2a".to_string()));
    assert_eq!(listing.last().map(String::as_str), Some("jmp hang"));
}

#[test]
fn custom_program_assembles() {
    let mut program = Program::new();
    program
        .label("top")
        .push(Instruction::Hlt)
        .push(Instruction::Jmp(bootsmith_asm::Label::new("top")));
    let code = program.assemble().unwrap();
    assert_eq!(&code[..], &[0xF4, 0xEB, 0xFD]);
}
