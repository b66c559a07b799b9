use pantsbridge_core::command::ToolCommand;

pub fn print_command_breakdown(command: &ToolCommand) {
    println!("   🔧 Command breakdown:");
    println!("      • program: {}", command.program);

    let mut args = command.args.iter();
    while let Some(arg) = args.next() {
        // Pair flags with their value so `--new-targets a,b` reads as one item
        if matches!(arg.as_str(), "--new-targets" | "--intellij-launcher") {
            if let Some(value) = args.next() {
                println!("      • {} {}", arg, value);
                continue;
            }
        }
        println!("      • {}", arg);
    }

    if let Some(dir) = command.working_dir() {
        println!("      • working dir: {}", dir.display());
    }

    if !command.env.is_empty() {
        println!("      • env:");
        for (key, value) in &command.env {
            println!("        {}={}", key, value);
        }
    }
}
