use std::fmt;

use crate::{
    compose::Stage,
    repr::{Field, MessageSpec, MessageType},
};

const PREAMBLE: &str = include_str!("../base/preamble.h");
const FOOTER: &str = "\n#endif /* __MESSAGESPEC_H */\n";

/// The sections of a generated header. Each section is rendered from the validated spec alone, and
/// sections refer to each other only through the names derived from a message type's key.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCode {
    pub(crate) enumeration: String,
    pub(crate) layouts: Vec<String>,
    pub(crate) send_stubs: Vec<String>,
    pub(crate) formats: Vec<String>,
    pub(crate) registration_table: String,
    pub(crate) register_fn: String,
}

impl fmt::Display for GeneratedCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(PREAMBLE)?;
        f.write_str(&self.enumeration)?;

        f.write_str("\n/** @brief Convenience structs for sending telemetry */\n")?;
        for layout in &self.layouts {
            f.write_str(layout)?;
        }

        f.write_str("/** @brief Convenience functions for sending telemetry */\n")?;
        for stub in &self.send_stubs {
            f.write_str(stub)?;
        }

        f.write_str("/** @brief Machine understandable format for message specs */\n")?;
        for format in &self.formats {
            f.write_str(format)?;
        }

        f.write_str(&self.registration_table)?;
        f.write_str(&self.register_fn)?;
        f.write_str(FOOTER)
    }
}

pub fn generate(spec: &MessageSpec) -> GeneratedCode {
    tracing::debug!(stage = %Stage::Enumeration, "emitting");
    let enumeration = define_enum(spec);

    tracing::debug!(stage = %Stage::Layouts, "emitting");
    let layouts = spec.messages.iter().map(define_layout).collect();

    tracing::debug!(stage = %Stage::SendStubs, "emitting");
    let send_stubs = spec.messages.iter().map(define_send_stub).collect();

    tracing::debug!(stage = %Stage::Formats, "emitting");
    let formats = spec.messages.iter().map(define_format).collect();

    tracing::debug!(stage = %Stage::RegistrationTable, "emitting");
    let registration_table = define_registration_table(spec);

    tracing::debug!(stage = %Stage::RegistrationFunction, "emitting");
    let register_fn = define_register_fn();

    GeneratedCode { enumeration, layouts, send_stubs, formats, registration_table, register_fn }
}

fn define_enum(spec: &MessageSpec) -> String {
    let variants: String =
        spec.messages.iter().map(|msg| format!("  {} = {},\n", msg.ident, msg.id)).collect();
    let bundles = initializer(spec.bundles().map(|msg| msg.ident.clone()));

    format!(
        "/** @brief Message name enumeration, values are IDs */\n\
         typedef enum {{\n\
         {variants}\
         }} msgspec_types_t;\n\
         \n\
         const int msgspec_types_len = {len};\n\
         const int msgspec_bundle_types_len = {bundle_len};\n\
         const uint8_t msgspec_bundle_types[] = {bundles};\n",
        variants = variants,
        len = spec.len(),
        bundle_len = spec.bundles().count(),
        bundles = bundles,
    )
}

fn define_layout(msg: &MessageType) -> String {
    let fields: String = msg.fields.iter().map(define_field).collect();

    format!(
        "/** @brief {name}, {size} bytes serialized */\n\
         typedef struct {{\n\
         {fields}\
         }} {layout};\n\
         \n",
        name = msg.name,
        size = msg.wire_size(),
        fields = fields,
        layout = msg.layout_name(),
    )
}

fn define_field(field: &Field) -> String {
    format!("    {:<12}{};\n", field.ty.c_type(), field.name)
}

fn define_send_stub(msg: &MessageType) -> String {
    format!(
        "int {send_fn}(tbi_ctx_t* tbi, {layout} *value)\n\
         {{\n\
         \treturn tbi_telemetry_schedule(tbi, {ident}, (void*)value);\n\
         }}\n\
         \n",
        send_fn = msg.send_fn_name(),
        layout = msg.layout_name(),
        ident = msg.ident,
    )
}

fn define_format(msg: &MessageType) -> String {
    let codes = initializer(msg.format().into_iter().map(|code| code.to_string()));
    format!("const uint8_t {}[] = {};\n", msg.format_name(), codes)
}

fn define_registration_table(spec: &MessageSpec) -> String {
    let rows: String = spec.messages.iter().map(define_context_row).collect();

    format!(
        "\n/** @brief Initialize message context for each type */\n\
         tbi_msg_ctx_t msgspec_ctxs[] = {{\n\
         {rows}\
         }};\n\
         const int msgspec_ctxs_len = {len};\n\
         \n\
         /** @brief CRC16-CCITT of the message type IDs and their formats */\n\
         const uint16_t msgspec_schema_csum = {checksum:#06x};\n",
        rows = rows,
        len = spec.len(),
        checksum = spec.checksum(),
    )
}

#[rustfmt::skip]
fn define_context_row(msg: &MessageType) -> String {
    format!(
        "\t{{\n\
         \t\t.msgtype      = {ident},\n\
         \t\t.dcb          = {dcb},\n\
         \t\t.raw_size     = sizeof({layout}),\n\
         \t\t.format_len   = {format_len},\n\
         \t\t.format       = {format},\n\
         \t\t.buflen       = 0,\n\
         \t\t.head         = NULL,\n\
         \t}},\n",
        ident      = msg.ident,
        dcb        = msg.bundle,
        layout     = msg.layout_name(),
        format_len = msg.fields.len(),
        format     = msg.format_name(),
    )
}

fn define_register_fn() -> String {
    "\n/** @brief Register message spec with tbi context */\n\
     int tbi_register_msgspec(tbi_ctx_t* tbi)\n\
     {\n\
     \ttbi->msg_ctxs = msgspec_ctxs;\n\
     \ttbi->msg_ctxs_len = msgspec_ctxs_len;\n\
     \treturn 0;\n\
     }\n"
        .to_owned()
}

/// Renders a C brace initializer, `{ a, b }`, or `{ }` when there are no items. The empty form
/// only sizes an array under the GNU zero-length array extension.
fn initializer<I: Iterator<Item = String>>(items: I) -> String {
    let items: Vec<String> = items.collect();
    match items.is_empty() {
        true => "{ }".to_owned(),
        false => format!("{{ {} }}", items.join(", ")),
    }
}
