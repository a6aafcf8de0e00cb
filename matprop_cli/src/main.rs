//! # MatProp CLI
//!
//! Command-line front end for `matprop_core`: evaluate registered formulas,
//! fit test data, summarize samples and run the fatigue, creep, fracture,
//! hardness and crystallography calculators. Every command prints a short
//! text report, or the full result as JSON with `--json`.

mod config;
mod parse;

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use matprop_core::formulas::creep::{self, CreepInput};
use matprop_core::formulas::crystal::{self, CrystalSystem, LatticeParameters};
use matprop_core::formulas::fatigue::{self, FatigueInput, FatigueLife, MeanStressModel};
use matprop_core::formulas::fracture::{self, FractureInput, Geometry};
use matprop_core::formulas::hardness::{self, HardnessReading, HardnessScale};
use matprop_core::formulas::mechanics::{self, TensileProperties};
use matprop_core::formulas::registry::{generate_formulas_markdown, Formula, FormulaInputs, ALL_FORMULAS};
use matprop_core::numeric::{self, fit_and_diagnose, interpolate_linear, solve_with_tolerance};
use matprop_core::{materials, CalcError, CalcSettings};

/// Ideal c/a ratio for close-packed hexagonal stacking
const IDEAL_HCP_C_OVER_A: f64 = 1.633;

#[derive(Parser)]
#[command(
    name = "matprop",
    version,
    about = "Materials engineering calculator - formulas, regression and statistics"
)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Config file (overrides $MATPROP_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List registered formulas
    List {
        /// Print the full markdown reference instead
        #[arg(long)]
        markdown: bool,
    },
    /// Evaluate a registered formula: matprop eval stress force_n=1e4 area_mm2=50
    Eval {
        /// Formula id (see `matprop list`)
        id: String,
        /// Inputs as key=value
        #[arg(value_parser = parse::parse_key_value)]
        inputs: Vec<(String, f64)>,
        /// Fill missing inputs with the documented example values
        #[arg(long)]
        example: bool,
    },
    /// Solve a dense linear system A·x = b
    Solve {
        /// Rows separated by ';', e.g. "2,1; 1,3"
        #[arg(short, long)]
        matrix: String,
        /// Right-hand side, e.g. "3,5"
        #[arg(short, long)]
        rhs: String,
    },
    /// Least-squares polynomial fit with R² and RMSE
    Fit {
        /// Points as "x,y; x,y; ..."
        #[arg(short, long)]
        points: String,
        #[arg(short, long, default_value = "2")]
        degree: usize,
        /// Also evaluate the fit and a linear interpolation at this x
        #[arg(long)]
        at: Option<f64>,
        /// Print the sampled fit curve
        #[arg(long)]
        curve: bool,
    },
    /// Summary statistics, histogram and Weibull modulus (reads stdin if no values)
    Stats {
        /// Values separated by commas, semicolons or whitespace
        values: Option<String>,
    },
    /// Mean-stress corrected fatigue life
    Fatigue {
        /// Stress amplitude Sa (MPa)
        #[arg(short, long)]
        amplitude: f64,
        /// Mean stress Sm (MPa)
        #[arg(short, long, default_value = "0")]
        mean: f64,
        /// goodman, gerber or soderberg
        #[arg(long, default_value = "goodman")]
        model: MeanStressModel,
        /// Take strengths from the materials catalog
        #[arg(long)]
        material: Option<String>,
        /// Ultimate tensile strength (MPa)
        #[arg(long)]
        uts: Option<f64>,
        /// Yield strength (MPa)
        #[arg(long = "yield")]
        yield_strength: Option<f64>,
        /// Endurance limit (MPa)
        #[arg(long)]
        endurance: Option<f64>,
        /// Print the S-N line with this many samples
        #[arg(long)]
        sn: Option<usize>,
    },
    /// Norton creep rate and Larson-Miller rupture time
    Creep {
        /// Stress (MPa)
        #[arg(short, long)]
        stress: f64,
        /// Temperature (°C)
        #[arg(short, long)]
        temperature: f64,
        /// Norton coefficient A
        #[arg(long)]
        coefficient: f64,
        /// Norton stress exponent n
        #[arg(long)]
        exponent: f64,
        /// Activation energy Q (J/mol)
        #[arg(long)]
        activation_energy: f64,
        /// Larson-Miller constant C (default from config)
        #[arg(long)]
        lm_constant: Option<f64>,
    },
    /// ASTM E399 stress intensity for C(T) or SE(B) specimens
    Fracture {
        #[arg(short, long, value_enum, default_value = "ct")]
        geometry: GeometryArg,
        /// Load P (kN)
        #[arg(short, long)]
        load: f64,
        /// Thickness B (mm)
        #[arg(long)]
        thickness: f64,
        /// Width W (mm)
        #[arg(long)]
        width: f64,
        /// Crack length a (mm)
        #[arg(long)]
        crack: f64,
        /// Support span S for SE(B) (mm, default 4W)
        #[arg(long)]
        span: Option<f64>,
        /// Yield strength for the plane-strain check (MPa)
        #[arg(long = "yield")]
        yield_strength: Option<f64>,
    },
    /// Convert hardness between HV, HRC, HRB and HB
    Hardness {
        value: f64,
        #[arg(long)]
        from: HardnessScale,
        /// Target scale (all scales when omitted)
        #[arg(long)]
        to: Option<HardnessScale>,
    },
    /// Unit cell volume, theoretical density and packing fraction
    Crystal {
        /// sc, bcc, fcc, hcp or dc
        #[arg(short, long)]
        system: CrystalSystem,
        /// Lattice parameter a (Å)
        #[arg(short)]
        a: f64,
        /// Lattice parameter c (Å), HCP only
        #[arg(short)]
        c: Option<f64>,
        /// Molar mass (g/mol)
        #[arg(short, long)]
        molar_mass: f64,
    },
    /// Idealized powder XRD peak positions
    Xrd {
        #[arg(short, long)]
        system: CrystalSystem,
        #[arg(short)]
        a: f64,
        #[arg(short)]
        c: Option<f64>,
        /// Wavelength (Å, default from config)
        #[arg(short, long)]
        wavelength: Option<f64>,
        /// Highest Miller index (default from config)
        #[arg(long)]
        max_index: Option<u8>,
    },
    /// Synthesize an engineering stress-strain curve
    Curve {
        /// Take properties from the materials catalog
        #[arg(long)]
        material: Option<String>,
        /// Young's modulus (GPa)
        #[arg(long)]
        modulus: Option<f64>,
        /// Yield strength (MPa)
        #[arg(long = "yield")]
        yield_strength: Option<f64>,
        /// Ultimate tensile strength (MPa)
        #[arg(long)]
        uts: Option<f64>,
        /// Elongation at fracture (fraction)
        #[arg(long)]
        elongation: Option<f64>,
        /// Number of curve points (default from config)
        #[arg(long)]
        points: Option<usize>,
        /// Print every curve point
        #[arg(long)]
        table: bool,
    },
    /// Show the reference materials catalog
    Materials {
        /// Material key for a detailed view
        key: Option<String>,
    },
    /// Show the active config file and settings
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum GeometryArg {
    /// Compact tension
    Ct,
    /// Single-edge notched bend
    Senb,
}

/// Settings shared by every command.
struct Session {
    json: bool,
    precision: usize,
    settings: CalcSettings,
    config_path: Option<PathBuf>,
}

impl Session {
    fn num(&self, v: f64) -> String {
        fmt_num(v, self.precision)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let json_flag = cli.json;
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, json_flag);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let ctx = Session {
        json: cli.json || config.output.json,
        precision: config.output.precision,
        settings: config.calc,
        config_path: cli.config,
    };

    match cli.command {
        Commands::List { markdown } => cmd_list(&ctx, markdown),
        Commands::Eval { id, inputs, example } => cmd_eval(&ctx, &id, inputs, example),
        Commands::Solve { matrix, rhs } => cmd_solve(&ctx, &matrix, &rhs),
        Commands::Fit { points, degree, at, curve } => cmd_fit(&ctx, &points, degree, at, curve),
        Commands::Stats { values } => cmd_stats(&ctx, values),
        Commands::Fatigue {
            amplitude,
            mean,
            model,
            material,
            uts,
            yield_strength,
            endurance,
            sn,
        } => {
            let input = fatigue_input(amplitude, mean, model, material.as_deref(), uts, yield_strength, endurance)?;
            cmd_fatigue(&ctx, &input, sn)
        }
        Commands::Creep {
            stress,
            temperature,
            coefficient,
            exponent,
            activation_energy,
            lm_constant,
        } => {
            let input = CreepInput {
                stress_mpa: stress,
                temperature_c: temperature,
                coefficient,
                exponent,
                activation_energy,
                larson_miller_constant: lm_constant.unwrap_or(ctx.settings.creep.larson_miller_constant),
            };
            cmd_creep(&ctx, &input)
        }
        Commands::Fracture {
            geometry,
            load,
            thickness,
            width,
            crack,
            span,
            yield_strength,
        } => {
            let geometry = match geometry {
                GeometryArg::Ct => Geometry::CompactTension,
                GeometryArg::Senb => Geometry::SingleEdgeBend {
                    span_mm: span.unwrap_or(4.0 * width),
                },
            };
            let input = FractureInput {
                geometry,
                load_kn: load,
                thickness_mm: thickness,
                width_mm: width,
                crack_length_mm: crack,
                yield_strength_mpa: yield_strength,
            };
            cmd_fracture(&ctx, &input)
        }
        Commands::Hardness { value, from, to } => cmd_hardness(&ctx, value, from, to),
        Commands::Crystal { system, a, c, molar_mass } => cmd_crystal(&ctx, system, a, c, molar_mass),
        Commands::Xrd {
            system,
            a,
            c,
            wavelength,
            max_index,
        } => cmd_xrd(&ctx, system, a, c, wavelength, max_index),
        Commands::Curve {
            material,
            modulus,
            yield_strength,
            uts,
            elongation,
            points,
            table,
        } => {
            let props = tensile_properties(material.as_deref(), modulus, yield_strength, uts, elongation)?;
            cmd_curve(&ctx, &props, points, table)
        }
        Commands::Materials { key } => cmd_materials(&ctx, key.as_deref()),
        Commands::Config => cmd_config(&ctx),
    }
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_list(ctx: &Session, markdown: bool) -> Result<()> {
    if markdown {
        print!("{}", generate_formulas_markdown());
        return Ok(());
    }
    if ctx.json {
        let all: Vec<_> = ALL_FORMULAS.iter().map(|f| f.metadata()).collect();
        return print_json(&all);
    }

    for category in Formula::all_categories() {
        println!("{}", category.display_name());
        for formula in Formula::in_category(category) {
            let meta = formula.metadata();
            let keys: Vec<&str> = meta.inputs.iter().map(|i| i.key).collect();
            println!("  {:<28} {:<36} [{}]  {}", meta.id, meta.name, meta.unit, keys.join(" "));
        }
        println!();
    }
    Ok(())
}

fn cmd_eval(ctx: &Session, id: &str, pairs: Vec<(String, f64)>, example: bool) -> Result<()> {
    let formula = Formula::from_id(id)?;
    let meta = formula.metadata();

    let mut inputs = FormulaInputs::new();
    if example {
        for input in &meta.inputs {
            inputs.insert(input.key.to_string(), input.example);
        }
    }
    inputs.extend(pairs);
    debug!(formula = meta.id, inputs = inputs.len(), "eval");

    let value = formula
        .evaluate(&inputs)
        .with_context(|| format!("evaluating {}", meta.id))?;

    if ctx.json {
        return print_json(&json!({
            "formula": meta.id,
            "inputs": inputs,
            "value": value,
            "unit": meta.unit,
        }));
    }

    println!("{}", meta.name);
    println!("  {}", meta.formula_plain);
    for input in &meta.inputs {
        if let Some(v) = inputs.get(input.key) {
            println!("  {:<24} = {} {}", input.key, ctx.num(*v), input.unit);
        }
    }
    println!();
    println!("  Result: {} {}", ctx.num(value), meta.unit);
    Ok(())
}

fn cmd_solve(ctx: &Session, matrix: &str, rhs: &str) -> Result<()> {
    let a = parse::parse_matrix(matrix).context("parsing --matrix")?;
    let b = parse::parse_numbers(rhs).context("parsing --rhs")?;
    let solution = solve_with_tolerance(&a, &b, ctx.settings.solver.pivot_tolerance)?;

    if ctx.json {
        return print_json(&solution);
    }

    if solution.singular {
        println!("[WARN] Singular system: returning the zero vector");
    }
    for (i, x) in solution.x.iter().enumerate() {
        println!("  x{} = {}", i + 1, ctx.num(*x));
    }
    Ok(())
}

fn cmd_fit(ctx: &Session, points: &str, degree: usize, at: Option<f64>, curve: bool) -> Result<()> {
    let points = parse::parse_points(points).context("parsing --points")?;
    let report = fit_and_diagnose(&points, degree, &ctx.settings)?;

    let probe = match at {
        Some(x) => Some(json!({
            "x": x,
            "fit": report.fit.polynomial.evaluate(x),
            "interpolated": interpolate_linear(&points, x).ok(),
        })),
        None => None,
    };

    if ctx.json {
        return print_json(&json!({ "report": report, "at": probe }));
    }

    let fit = &report.fit;
    if fit.degree != fit.requested_degree {
        println!("[WARN] Degree reduced from {} to {} for {} points", fit.requested_degree, fit.degree, points.len());
    }
    if fit.singular {
        println!("[WARN] Normal equations are singular; coefficients are zero");
    }
    println!("Polynomial (degree {}):", fit.degree);
    for (i, c) in fit.polynomial.coefficients().iter().enumerate() {
        println!("  c{} = {}", i, ctx.num(*c));
    }
    println!("  R²   = {}", ctx.num(report.diagnostics.r_squared));
    println!("  RMSE = {}", ctx.num(report.diagnostics.rmse));

    if let Some(x) = at {
        println!();
        println!("At x = {}:", ctx.num(x));
        println!("  fit          = {}", ctx.num(fit.polynomial.evaluate(x)));
        match interpolate_linear(&points, x) {
            Ok(y) => println!("  interpolated = {}", ctx.num(y)),
            Err(e) => println!("  interpolated = N/A ({})", e),
        }
    }

    if curve {
        println!();
        for p in &report.diagnostics.curve {
            println!("  {:>14} {:>14}", ctx.num(p.x), ctx.num(p.y));
        }
    }
    Ok(())
}

fn cmd_stats(ctx: &Session, values: Option<String>) -> Result<()> {
    let text = match values {
        Some(v) => v,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading values from stdin")?;
            buf
        }
    };
    let summary = numeric::summarize_text(&text)?;

    if ctx.json {
        return print_json(&summary);
    }

    println!("  n        = {}", summary.n);
    println!("  mean     = {}", ctx.num(summary.mean));
    println!("  median   = {}", ctx.num(summary.median));
    println!("  std dev  = {}", ctx.num(summary.std_dev));
    println!("  CoV      = {} %", ctx.num(summary.cov));
    println!("  min/max  = {} / {}", ctx.num(summary.min), ctx.num(summary.max));
    println!("  Q1/Q3    = {} / {} (IQR {})", ctx.num(summary.q1), ctx.num(summary.q3), ctx.num(summary.iqr()));
    if summary.weibull_shape > 0.0 {
        println!("  Weibull  m = {}, η = {}", ctx.num(summary.weibull_shape), ctx.num(summary.weibull_scale));
    } else {
        println!("  Weibull  N/A");
    }

    println!();
    let peak = summary.histogram.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for bin in &summary.histogram {
        let bar = "#".repeat(bin.count * 40 / peak);
        println!("  [{:>12}, {:>12}) {:>4} {}", ctx.num(bin.lower), ctx.num(bin.upper), bin.count, bar);
    }
    Ok(())
}

fn fatigue_input(
    amplitude: f64,
    mean: f64,
    model: MeanStressModel,
    material: Option<&str>,
    uts: Option<f64>,
    yield_strength: Option<f64>,
    endurance: Option<f64>,
) -> Result<FatigueInput> {
    let mut input = match material {
        Some(key) => materials::find(key)?.fatigue_input(amplitude, mean, model),
        None => FatigueInput {
            stress_amplitude: amplitude,
            mean_stress: mean,
            tensile_strength: uts.context("--uts is required without --material")?,
            yield_strength,
            endurance_limit: endurance.context("--endurance is required without --material")?,
            model,
        },
    };
    if let Some(v) = uts {
        input.tensile_strength = v;
    }
    if yield_strength.is_some() {
        input.yield_strength = yield_strength;
    }
    if let Some(v) = endurance {
        input.endurance_limit = v;
    }
    Ok(input)
}

fn cmd_fatigue(ctx: &Session, input: &FatigueInput, sn: Option<usize>) -> Result<()> {
    let result = fatigue::assess(input)?;
    let sn_curve = match sn {
        Some(samples) => Some(fatigue::sn_curve(input.tensile_strength, input.endurance_limit, samples)?),
        None => None,
    };

    if ctx.json {
        return print_json(&json!({ "input": input, "result": result, "sn_curve": sn_curve }));
    }

    println!("{} mean-stress correction", result.model.display_name());
    println!("  Sa = {} MPa, Sm = {} MPa", ctx.num(input.stress_amplitude), ctx.num(input.mean_stress));
    println!("  Seq = {} MPa", ctx.num(result.equivalent_stress));
    let life = match result.life {
        FatigueLife::Infinite => "infinite".to_string(),
        FatigueLife::Finite(n) => format!("{} cycles", fmt_num(n, 3)),
    };
    println!(
        "  Life: {}  (Se/Seq = {}) {}",
        life,
        ctx.num(result.safety_factor),
        status_icon(result.life.is_infinite())
    );

    if let Some(curve) = sn_curve {
        println!();
        println!("  {:>14} {:>14}", "N", "S (MPa)");
        for p in curve {
            println!("  {:>14} {:>14}", fmt_num(p.x, 0), ctx.num(p.y));
        }
    }
    Ok(())
}

fn cmd_creep(ctx: &Session, input: &CreepInput) -> Result<()> {
    let result = creep::analyze(input)?;

    if ctx.json {
        return print_json(&json!({ "input": input, "result": result }));
    }

    println!("Creep at {} MPa, {} °C", ctx.num(input.stress_mpa), ctx.num(input.temperature_c));
    println!("  Creep rate     = {} 1/s", ctx.num(result.creep_rate));
    println!("  LMP            = {}", ctx.num(result.larson_miller_parameter));
    println!("  Rupture time   = {} h", ctx.num(result.rupture_time_hours));
    println!("  Strain at t_r  = {}", ctx.num(result.strain_at_rupture));
    println!("  (Larson-Miller parameter from a linear stress correlation; calibrate before use)");
    Ok(())
}

fn cmd_fracture(ctx: &Session, input: &FractureInput) -> Result<()> {
    let result = fracture::stress_intensity(input)?;

    if ctx.json {
        return print_json(&json!({ "input": input, "result": result }));
    }

    println!("{} specimen", input.geometry.display_name());
    println!("  a/W  = {}", ctx.num(result.crack_ratio));
    println!("  f    = {}", ctx.num(result.geometry_factor));
    println!("  K_Q  = {} MPa√m", ctx.num(result.stress_intensity));
    if let (Some(size), Some(valid)) = (result.plane_strain_size_mm, result.plane_strain_valid) {
        println!(
            "  Plane strain: B, a ≥ {} mm {}",
            ctx.num(size),
            status_icon(valid)
        );
    }
    Ok(())
}

#[derive(Serialize)]
struct Conversion {
    scale: HardnessScale,
    reading: HardnessReading,
}

fn cmd_hardness(ctx: &Session, value: f64, from: HardnessScale, to: Option<HardnessScale>) -> Result<()> {
    let targets: Vec<HardnessScale> = match to {
        Some(scale) => vec![scale],
        None => HardnessScale::ALL.into_iter().filter(|s| *s != from).collect(),
    };
    let conversions = targets
        .into_iter()
        .map(|scale| -> Result<Conversion> {
            Ok(Conversion { scale, reading: hardness::convert(value, from, scale)? })
        })
        .collect::<Result<Vec<_>>>()?;
    let uts = match hardness::convert(value, from, HardnessScale::Hv)? {
        HardnessReading::Value(hv) => Some(hardness::estimate_tensile_strength(hv)?),
        _ => None,
    };

    if ctx.json {
        return print_json(&json!({
            "value": value,
            "scale": from,
            "conversions": conversions,
            "tensile_strength_estimate": uts,
        }));
    }

    println!("{} {}", ctx.num(value), from);
    for c in &conversions {
        let flag = if c.reading.is_out_of_range() { " (outside conversion range)" } else { "" };
        println!("  {:<4} {}{}", c.scale.symbol(), c.reading, flag);
    }
    if let Some(uts) = uts {
        println!("  UTS ≈ {} MPa (steels)", ctx.num(uts));
    }
    Ok(())
}

fn lattice(system: CrystalSystem, a: f64, c: Option<f64>) -> LatticeParameters {
    match system {
        CrystalSystem::Hcp => LatticeParameters::hexagonal(a, c.unwrap_or(a * IDEAL_HCP_C_OVER_A)),
        _ => LatticeParameters::cubic(a),
    }
}

fn cmd_crystal(ctx: &Session, system: CrystalSystem, a: f64, c: Option<f64>, molar_mass: f64) -> Result<()> {
    let result = crystal::analyze(system, &lattice(system, a, c), molar_mass)?;

    if ctx.json {
        return print_json(&result);
    }

    println!("{}", system.display_name());
    println!("  Atoms per cell   = {}", result.atoms_per_cell);
    println!("  Packing fraction = {}", ctx.num(result.packing_fraction));
    println!("  Cell volume      = {} Å³", ctx.num(result.volume_a3));
    println!("  Density          = {} g/cm³", ctx.num(result.density_g_cm3));
    Ok(())
}

fn cmd_xrd(
    ctx: &Session,
    system: CrystalSystem,
    a: f64,
    c: Option<f64>,
    wavelength: Option<f64>,
    max_index: Option<u8>,
) -> Result<()> {
    let wavelength = wavelength.unwrap_or(ctx.settings.crystal.wavelength_angstrom);
    let max_index = max_index.unwrap_or(ctx.settings.crystal.max_index);
    let peaks = crystal::xrd_peaks(system, &lattice(system, a, c), wavelength, max_index)?;

    if ctx.json {
        return print_json(&peaks);
    }

    println!("{} at λ = {} Å", system.display_name(), wavelength);
    println!("  {:<8} {:>10} {:>10} {:>10}", "hkl", "d (Å)", "2θ (°)", "I");
    for peak in &peaks {
        println!(
            "  {:<8} {:>10.4} {:>10.3} {:>10.1}",
            peak.miller_label(),
            peak.d_spacing,
            peak.two_theta,
            peak.intensity
        );
    }
    println!("  (intensities are illustrative, not structure factors)");
    Ok(())
}

fn tensile_properties(
    material: Option<&str>,
    modulus: Option<f64>,
    yield_strength: Option<f64>,
    uts: Option<f64>,
    elongation: Option<f64>,
) -> Result<TensileProperties> {
    let mut props = match material {
        Some(key) => materials::find(key)?.tensile_properties(),
        None => TensileProperties {
            youngs_modulus_gpa: modulus.context("--modulus is required without --material")?,
            yield_strength_mpa: yield_strength.context("--yield is required without --material")?,
            tensile_strength_mpa: uts.context("--uts is required without --material")?,
            elongation: elongation.context("--elongation is required without --material")?,
        },
    };
    if let Some(v) = modulus {
        props.youngs_modulus_gpa = v;
    }
    if let Some(v) = yield_strength {
        props.yield_strength_mpa = v;
    }
    if let Some(v) = uts {
        props.tensile_strength_mpa = v;
    }
    if let Some(v) = elongation {
        props.elongation = v;
    }
    Ok(props)
}

fn cmd_curve(ctx: &Session, props: &TensileProperties, points: Option<usize>, table: bool) -> Result<()> {
    let curve = mechanics::synthesize_stress_strain(props, points.unwrap_or(ctx.settings.curve.points))?;

    if ctx.json {
        return print_json(&curve);
    }

    println!("Engineering stress-strain curve ({} points)", curve.points.len());
    println!("  Yield strain     = {}", ctx.num(curve.yield_strain));
    println!("  Uniform strain   = {}", ctx.num(curve.uniform_strain));
    println!("  Fracture stress  = {} MPa", ctx.num(curve.fracture_stress_mpa));
    println!("  Resilience       = {} MJ/m³", ctx.num(curve.resilience_mj_m3));
    println!("  Toughness        = {} MJ/m³", ctx.num(curve.toughness_mj_m3));
    if table {
        println!();
        println!("  {:>12} {:>12}", "strain", "stress");
        for p in &curve.points {
            println!("  {:>12} {:>12}", ctx.num(p.x), ctx.num(p.y));
        }
    }
    Ok(())
}

fn cmd_materials(ctx: &Session, key: Option<&str>) -> Result<()> {
    match key {
        Some(key) => {
            let m = materials::find(key)?;
            if ctx.json {
                return print_json(m);
            }
            println!("{} ({})", m.name, m.condition);
            println!("  E          = {} GPa", ctx.num(m.youngs_modulus_gpa));
            println!("  ν          = {}", ctx.num(m.poisson_ratio));
            println!("  Yield      = {} MPa", ctx.num(m.yield_strength_mpa));
            println!("  UTS        = {} MPa", ctx.num(m.tensile_strength_mpa));
            println!("  Elongation = {} %", ctx.num(m.elongation * 100.0));
            println!("  Density    = {} kg/m³", ctx.num(m.density_kg_m3));
            println!("  α          = {} 1/K", ctx.num(m.expansion_coefficient));
            println!("  k          = {} W/(m·K)", ctx.num(m.thermal_conductivity));
            println!("  Cp         = {} J/(kg·K)", ctx.num(m.specific_heat));
            println!("  Se         = {} MPa", ctx.num(m.endurance_limit_mpa));
        }
        None => {
            if ctx.json {
                return print_json(materials::all());
            }
            println!("  {:<10} {:<28} {:>8} {:>8} {:>8}", "key", "name", "E GPa", "Sy MPa", "Su MPa");
            for m in materials::all() {
                println!(
                    "  {:<10} {:<28} {:>8.1} {:>8.0} {:>8.0}",
                    m.key, m.name, m.youngs_modulus_gpa, m.yield_strength_mpa, m.tensile_strength_mpa
                );
            }
        }
    }
    Ok(())
}

fn cmd_config(ctx: &Session) -> Result<()> {
    if ctx.json {
        return print_json(&ctx.settings);
    }
    println!("Config: {}", config::show_config_path(ctx.config_path.as_deref()));
    print!("{}", toml::to_string_pretty(&ctx.settings).context("rendering settings")?);
    Ok(())
}

// ============================================================================
// Output helpers
// ============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("serializing result")?);
    Ok(())
}

fn report_error(err: &anyhow::Error, json: bool) {
    eprintln!("Error: {:#}", err);
    if json {
        if let Some(calc) = err.downcast_ref::<CalcError>() {
            if let Ok(body) = serde_json::to_string_pretty(&json!({
                "label": calc.display_label(),
                "code": calc.error_code(),
                "error": calc,
            })) {
                eprintln!("{}", body);
            }
        }
    }
}

/// Fixed notation for ordinary magnitudes, scientific for very small or large.
fn fmt_num(v: f64, precision: usize) -> String {
    if v != 0.0 && (v.abs() < 1e-3 || v.abs() >= 1e6) {
        format!("{:.*e}", precision, v)
    } else {
        format!("{:.*}", precision, v)
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass {
        "[OK]"
    } else {
        "[FAIL]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_eval_args() {
        let cli = Cli::try_parse_from(["matprop", "eval", "stress", "force_n=1e4", "area_mm2=50"]).unwrap();
        match cli.command {
            Commands::Eval { id, inputs, example } => {
                assert_eq!(id, "stress");
                assert_eq!(inputs, vec![("force_n".to_string(), 1e4), ("area_mm2".to_string(), 50.0)]);
                assert!(!example);
            }
            _ => panic!("expected eval"),
        }
    }

    #[test]
    fn test_parse_typed_args() {
        let cli = Cli::try_parse_from([
            "matprop", "--json", "fatigue", "-a", "200", "-m", "50", "--model", "soderberg", "--material", "4340",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Fatigue { model: MeanStressModel::Soderberg, .. }
        ));

        assert!(Cli::try_parse_from(["matprop", "hardness", "300", "--from", "HK"]).is_err());
        assert!(Cli::try_parse_from(["matprop", "crystal", "-s", "fcc", "-a", "4.05", "-m", "26.98"]).is_ok());
    }

    #[test]
    fn test_fatigue_input_overrides() {
        let input = fatigue_input(200.0, 50.0, MeanStressModel::Goodman, Some("1020"), Some(400.0), None, None).unwrap();
        assert_eq!(input.tensile_strength, 400.0);
        assert_eq!(input.yield_strength, Some(210.0));
        assert_eq!(input.endurance_limit, 190.0);

        assert!(fatigue_input(200.0, 0.0, MeanStressModel::Goodman, None, Some(600.0), None, None).is_err());
        assert!(fatigue_input(200.0, 0.0, MeanStressModel::Goodman, Some("nope"), None, None, None).is_err());
    }

    #[test]
    fn test_tensile_properties_from_flags() {
        let props = tensile_properties(None, Some(200.0), Some(250.0), Some(400.0), Some(0.25)).unwrap();
        assert_eq!(props.youngs_modulus_gpa, 200.0);
        assert!(tensile_properties(None, Some(200.0), None, Some(400.0), Some(0.25)).is_err());
    }

    #[test]
    fn test_hcp_default_c() {
        let l = lattice(CrystalSystem::Hcp, 3.0, None);
        assert!((l.c - 3.0 * IDEAL_HCP_C_OVER_A).abs() < 1e-12);
        assert_eq!(l.gamma, 120.0);
        assert_eq!(lattice(CrystalSystem::Bcc, 2.87, Some(9.9)).c, 2.87);
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(218.18181, 2), "218.18");
        assert_eq!(fmt_num(0.0, 2), "0.00");
        assert_eq!(fmt_num(1.5e-7, 2), "1.50e-7");
    }

    #[test]
    fn test_error_downcast_through_context() {
        let err: anyhow::Error = Err::<(), _>(CalcError::unknown_formula("x"))
            .context("evaluating x")
            .unwrap_err();
        assert!(err.downcast_ref::<CalcError>().is_some());
    }
}
