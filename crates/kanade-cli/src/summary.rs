use console::Style;
use kanade_core::pipeline::config::FlowConfig;
use kanade_core::pipeline::FlowSummary;
use kanade_core::source::InputSpec;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_summary(config: &FlowConfig) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Kanade Gradients"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(16)));
    println!();

    // Input / Output
    match config.input {
        InputSpec::Path(ref path) => println!(
            "  {:<14}{}",
            s.label.apply_to("Input"),
            s.path.apply_to(path.display())
        ),
        InputSpec::DefaultDevice => println!(
            "  {:<14}{}",
            s.label.apply_to("Input"),
            s.method.apply_to(format!(
                "stdin ({}x{} raw)",
                config.device.width, config.device.height
            ))
        ),
    }
    match config.output.dir {
        Some(ref dir) => println!(
            "  {:<14}{} {}",
            s.label.apply_to("Output"),
            s.path.apply_to(dir.display()),
            s.method.apply_to(format!("({})", config.output.format))
        ),
        None => println!(
            "  {:<14}{}",
            s.label.apply_to("Output"),
            s.disabled.apply_to("discarded")
        ),
    }
    println!();

    // Gradient grid
    println!("  {}", s.header.apply_to("Gradients"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Window"),
        s.value.apply_to(config.gradient.window)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Shift"),
        s.value.apply_to(config.gradient.shift)
    );
    if config.preprocess.downscale > 1.0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Downscale"),
            s.value.apply_to(format!("1/{}", config.preprocess.downscale))
        );
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Downscale"),
            s.disabled.apply_to("none")
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Constant"),
        s.method.apply_to(config.normalize.degenerate)
    );
    if let Some(max) = config.max_cycles {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Max cycles"),
            s.value.apply_to(max)
        );
    }
    println!();
}

pub fn print_flow_result(summary: &FlowSummary, config: &FlowConfig) {
    let s = Styles::new();

    println!("  {}", s.header.apply_to("Result"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Cycles"),
        s.value.apply_to(summary.cycles)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Frames"),
        s.value.apply_to(format!("{}x{}", summary.frame_width, summary.frame_height))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Grid"),
        s.value.apply_to(format!("{}x{}", summary.grid_cols, summary.grid_rows))
    );
    if summary.degenerate_cycles > 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Constant"),
            s.disabled.apply_to(format!("{} cycle(s)", summary.degenerate_cycles))
        );
    }
    if let Some(ref dir) = config.output.dir {
        println!();
        println!("  Output saved to {}", s.path.apply_to(dir.display()));
    }
    println!();
}
