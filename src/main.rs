//! Command-line interface for xsd-semantic

#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
use xsd_semantic::api::ApiModel;
#[cfg(feature = "cli")]
use xsd_semantic::render::{
    compose_openapi, render_context, render_json_schema, render_rdf_schema, render_shacl,
    OpenApiOptions, RenderOptions,
};
#[cfg(feature = "cli")]
use xsd_semantic::schema::{SchemaModel, SchemaParser, TypeKind};
#[cfg(feature = "cli")]
use xsd_semantic::writer::{write_document, OutputFormat};

#[cfg(feature = "cli")]
#[derive(Parser, Debug)]
#[command(name = "xsd-semantic")]
#[command(author, version, about = "IEEE 2030.5 schema converters", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Input schema and output file shared by every generator
#[cfg(feature = "cli")]
#[derive(Args, Debug)]
struct Io {
    /// Path to the XSD file
    #[arg(value_name = "XSD")]
    xsd_file: PathBuf,

    /// Output file path (.yaml/.yml writes YAML, anything else JSON)
    #[arg(value_name = "OUTPUT")]
    output_file: PathBuf,

    /// Vocabulary base URI (default: derived from the target namespace)
    #[arg(long)]
    base_uri: Option<String>,
}

#[cfg(feature = "cli")]
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a JSON-LD context
    #[command(name = "jsonld-context")]
    JsonldContext {
        #[command(flatten)]
        io: Io,

        /// Exclude documentation/descriptions
        #[arg(long)]
        exclude_docs: bool,

        /// Exclude enum values
        #[arg(long)]
        exclude_enums: bool,

        /// Exclude schema relationships (property terms)
        #[arg(long)]
        exclude_schema: bool,

        /// URL of a SHACL shapes file to reference from the context
        #[arg(long)]
        shacl_file_url: Option<String>,
    },

    /// Generate a JSON-LD schema (RDF/OWL)
    #[command(name = "jsonld-schema")]
    JsonldSchema {
        #[command(flatten)]
        io: Io,

        /// Exclude documentation/descriptions
        #[arg(long)]
        exclude_docs: bool,

        /// Exclude enum values
        #[arg(long)]
        exclude_enums: bool,
    },

    /// Generate SHACL shapes
    Shacl {
        #[command(flatten)]
        io: Io,

        /// Exclude documentation/descriptions
        #[arg(long)]
        exclude_docs: bool,

        /// Exclude enum values
        #[arg(long)]
        exclude_enums: bool,
    },

    /// Generate a JSON Schema
    #[command(name = "json-schema")]
    JsonSchema {
        #[command(flatten)]
        io: Io,

        /// Exclude documentation/descriptions
        #[arg(long)]
        exclude_docs: bool,

        /// Exclude enum values
        #[arg(long)]
        exclude_enums: bool,
    },

    /// Generate an OpenAPI specification
    Openapi {
        #[command(flatten)]
        io: Io,

        /// Path to a WADL file (adds paths if provided)
        #[arg(long)]
        wadl_file: Option<PathBuf>,

        /// API title
        #[arg(long, default_value = "IEEE 2030.5 API")]
        api_title: String,

        /// API version
        #[arg(long, default_value = "1.0.0")]
        api_version: String,

        /// Exclude documentation/descriptions
        #[arg(long)]
        exclude_docs: bool,

        /// Exclude enum values
        #[arg(long)]
        exclude_enums: bool,

        /// Exclude the JSON-LD context from the OpenAPI document
        #[arg(long)]
        exclude_context: bool,

        /// Also write the JSON-LD context to this file and reference it
        #[arg(long)]
        context_output_file: Option<PathBuf>,
    },

    /// Inspect an XSD schema and display its type registry
    Inspect {
        /// Path to the XSD file
        #[arg(value_name = "XSD")]
        xsd_file: PathBuf,

        /// Vocabulary base URI (default: derived from the target namespace)
        #[arg(long)]
        base_uri: Option<String>,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[cfg(feature = "cli")]
type CliResult = Result<(), Box<dyn std::error::Error>>;

#[cfg(feature = "cli")]
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::JsonldContext {
            io,
            exclude_docs,
            exclude_enums,
            exclude_schema,
            shacl_file_url,
        } => {
            let options = RenderOptions::new()
                .with_documentation(!exclude_docs)
                .with_enumerations(!exclude_enums)
                .with_schema_relationships(!exclude_schema)
                .with_shacl_reference_url(shacl_file_url);
            cmd_render(&io, |model| render_context(model, &options))
        }
        Commands::JsonldSchema {
            io,
            exclude_docs,
            exclude_enums,
        } => {
            let options = RenderOptions::new()
                .with_documentation(!exclude_docs)
                .with_enumerations(!exclude_enums);
            cmd_render(&io, |model| render_rdf_schema(model, &options))
        }
        Commands::Shacl {
            io,
            exclude_docs,
            exclude_enums,
        } => {
            let options = RenderOptions::new()
                .with_documentation(!exclude_docs)
                .with_enumerations(!exclude_enums);
            cmd_render(&io, |model| render_shacl(model, &options))
        }
        Commands::JsonSchema {
            io,
            exclude_docs,
            exclude_enums,
        } => {
            let options = RenderOptions::new()
                .with_documentation(!exclude_docs)
                .with_enumerations(!exclude_enums);
            cmd_render(&io, |model| render_json_schema(model, &options))
        }
        Commands::Openapi {
            io,
            wadl_file,
            api_title,
            api_version,
            exclude_docs,
            exclude_enums,
            exclude_context,
            context_output_file,
        } => {
            let render = RenderOptions::new()
                .with_documentation(!exclude_docs)
                .with_enumerations(!exclude_enums);
            let options = OpenApiOptions::new()
                .with_api_title(api_title)
                .with_api_version(api_version)
                .with_embed_context(!exclude_context)
                .with_render_options(render);
            cmd_openapi(&io, wadl_file, options, context_output_file)
        }
        Commands::Inspect {
            xsd_file,
            base_uri,
            json,
        } => cmd_inspect(&xsd_file, base_uri, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

#[cfg(feature = "cli")]
fn load_schema(xsd_file: &Path, base_uri: Option<String>) -> xsd_semantic::Result<SchemaModel> {
    let mut parser = SchemaParser::new();
    if let Some(base_uri) = base_uri {
        parser = parser.with_base_uri(base_uri);
    }
    parser.parse_file(xsd_file)
}

#[cfg(feature = "cli")]
fn cmd_render(io: &Io, render: impl FnOnce(&SchemaModel) -> serde_json::Value) -> CliResult {
    let model = load_schema(&io.xsd_file, io.base_uri.clone())?;
    let document = render(&model);
    write_document(
        &document,
        &io.output_file,
        OutputFormat::from_path(&io.output_file),
        false,
    )?;
    println!("✓ Generated: {}", io.output_file.display());
    Ok(())
}

#[cfg(feature = "cli")]
fn cmd_openapi(
    io: &Io,
    wadl_file: Option<PathBuf>,
    mut options: OpenApiOptions,
    context_output_file: Option<PathBuf>,
) -> CliResult {
    let model = load_schema(&io.xsd_file, io.base_uri.clone())?;
    let api = wadl_file.as_deref().map(ApiModel::from_file).transpose()?;

    if let Some(context_file) = &context_output_file {
        let context_options = options
            .render_options()
            .clone()
            .with_schema_relationships(true)
            .with_shacl_reference_url(None);
        let context = render_context(&model, &context_options);
        write_document(&context, context_file, OutputFormat::Json, false)?;

        options = options.with_external_context_path(Some(relative_to_output(
            context_file,
            &io.output_file,
        )));
    }

    let embedded = options.embed_context();
    let document = compose_openapi(&model, api.as_ref(), &options);
    write_document(
        &document,
        &io.output_file,
        OutputFormat::from_path(&io.output_file),
        true,
    )?;

    match (&context_output_file, embedded) {
        (Some(context_file), true) => {
            println!("✓ Generated: {}", io.output_file.display());
            println!("✓ Generated: {}", context_file.display());
        }
        (None, true) => {
            println!("✓ Generated: {} (with embedded context)", io.output_file.display())
        }
        _ => println!("✓ Generated: {}", io.output_file.display()),
    }
    Ok(())
}

/// Path of `target` as seen from the directory holding `output`
///
/// Falls back to `target` as given when it does not live under that
/// directory.
#[cfg(feature = "cli")]
fn relative_to_output(target: &Path, output: &Path) -> String {
    let absolute = |path: &Path| match std::env::current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    };
    let target_abs = absolute(target);
    let output_abs = absolute(output);

    output_abs
        .parent()
        .and_then(|dir| target_abs.strip_prefix(dir).ok())
        .map(|rel| rel.to_string_lossy().replace('\\', "/"))
        .unwrap_or_else(|| target.to_string_lossy().into_owned())
}

#[cfg(feature = "cli")]
fn cmd_inspect(xsd_file: &Path, base_uri: Option<String>, json_output: bool) -> CliResult {
    let model = load_schema(xsd_file, base_uri)?;

    if json_output {
        print_schema_json(&model)?;
    } else {
        print_schema_summary(&model);
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn count_kind(model: &SchemaModel, kind: TypeKind) -> usize {
    model.types().filter(|t| t.kind == kind).count()
}

#[cfg(feature = "cli")]
fn print_schema_summary(model: &SchemaModel) {
    println!("xsd-semantic v{}", xsd_semantic::VERSION);
    println!();
    println!("Schema Information:");
    println!(
        "  Target Namespace: {}",
        model.target_namespace().unwrap_or("(none)")
    );
    println!("  Base URI: {}", model.base_uri());
    println!();
    println!("Statistics:");
    println!("  Complex Types: {}", count_kind(model, TypeKind::Complex));
    println!("  Simple Types: {}", count_kind(model, TypeKind::Simple));
    println!("  Root Elements: {}", model.root_elements().count());

    println!("\n=== Types ===");
    for entry in model.types() {
        let kind = match entry.kind {
            TypeKind::Complex => "complex",
            TypeKind::Simple => "simple",
        };
        match entry.derived_from() {
            Some(base) => println!("  {} ({}) : {}", entry.name, kind, base),
            None => println!("  {} ({})", entry.name, kind),
        }
    }

    println!("\n=== Root Elements ===");
    for element in model.root_elements() {
        println!(
            "  {} : {}",
            element.name,
            element.type_name.as_deref().unwrap_or("anonymous")
        );
    }

    if !model.diagnostics().is_empty() {
        println!("\n=== Diagnostics ===");
        for diagnostic in model.diagnostics() {
            println!("  {:?}", diagnostic);
        }
    }
}

#[cfg(feature = "cli")]
fn print_schema_json(model: &SchemaModel) -> CliResult {
    use serde_json::{json, Map, Value};

    let mut output = Map::new();
    output.insert("targetNamespace".to_string(), json!(model.target_namespace()));
    output.insert("baseUri".to_string(), json!(model.base_uri()));

    let mut stats = Map::new();
    stats.insert("complexTypes".to_string(), json!(count_kind(model, TypeKind::Complex)));
    stats.insert("simpleTypes".to_string(), json!(count_kind(model, TypeKind::Simple)));
    stats.insert("rootElements".to_string(), json!(model.root_elements().count()));
    output.insert("statistics".to_string(), Value::Object(stats));

    let types: Vec<Value> = model
        .types()
        .map(|entry| {
            json!({
                "name": entry.name,
                "kind": entry.kind,
                "base": entry.derived_from(),
                "properties": entry.properties().count(),
            })
        })
        .collect();
    output.insert("types".to_string(), Value::Array(types));

    let elements: Vec<Value> = model
        .root_elements()
        .map(|element| json!({"name": element.name, "type": element.type_name}))
        .collect();
    output.insert("rootElements".to_string(), Value::Array(elements));
    output.insert(
        "diagnostics".to_string(),
        serde_json::to_value(model.diagnostics())?,
    );

    println!("{}", serde_json::to_string_pretty(&Value::Object(output))?);
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Rebuild with --features cli");
    std::process::exit(1);
}
