//! Application constants for casetrack
//!
//! Field names of the case store, status values, aging defaults and the
//! built-in holiday calendar.

// =============================================================================
// Case Record Field Names
// =============================================================================

/// Case management status
pub const FIELD_STATUS: &str = "Estado_Gestion";

/// Age stored on the case when it was resolved
pub const FIELD_STORED_AGE: &str = "Dia";

/// Filing date (YYYY-MM-DD)
pub const FIELD_FILING_DATE: &str = "Fecha Radicado";

/// Name of the office handling the case
pub const FIELD_OFFICE: &str = "nombre_oficina";

/// Primary ticket number
pub const FIELD_SN: &str = "SN";

/// Regulator-facing tracking code
pub const FIELD_CUN: &str = "CUN";

/// Customer national id number
pub const FIELD_NUIP: &str = "Nro_Nuip_Cliente";

/// Customer name
pub const FIELD_CUSTOMER_NAME: &str = "Nombre_Cliente";

/// Free-text observation filed with the complaint
pub const FIELD_OBSERVATION: &str = "obs";

/// Age as it appeared in the imported file
pub const FIELD_ORIGINAL_AGE: &str = "Dia_Original_CSV";

/// Complaint number referenced in the observation text
pub const FIELD_RELATED_COMPLAINT: &str = "Numero_Reclamo_Relacionado";

/// Date the case was assigned (first import)
pub const FIELD_ASSIGNED_DATE: &str = "fecha_asignacion";

// =============================================================================
// Aging
// =============================================================================

/// Status given to imported cases that carry none
pub const DEFAULT_STATUS: &str = "Pendiente";

/// Statuses whose age is frozen at resolution time
pub const TERMINAL_STATUSES: &[&str] = &["Resuelto", "Finalizado"];

/// Office name fragment carrying a contractual SLA offset
pub const OESIA_OFFICE_PATTERN: &str = "OESIA";

/// Days added to the age of cases handled by the OESIA office
pub const OESIA_ADJUSTMENT_DAYS: u32 = 2;

/// Largest calendar span the business-day calculator will walk
pub const MAX_SPAN_DAYS: i64 = 10_000;

/// Timezone used to determine "today"
pub const DEFAULT_TIMEZONE: &str = "America/Bogota";

/// Rendering of an unavailable age
pub const NOT_AVAILABLE: &str = "N/A";

/// ISO date format used throughout the case store
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// CSV Ingestion
// =============================================================================

/// NUIP values starting with one of these digits are known to carry trailing junk
pub const NUIP_TRUNCATE_PREFIXES: &[char] = &['8', '9'];

/// Length NUIP values with a truncation prefix are cut to
pub const NUIP_MAX_LEN: usize = 9;

// =============================================================================
// Configuration
// =============================================================================

/// Directory name under the user config dir
pub const CONFIG_DIR_NAME: &str = "casetrack";

/// Config file name inside [`CONFIG_DIR_NAME`]
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Name of the built-in holiday calendar
pub const DEFAULT_CALENDAR_NAME: &str = "colombia";

/// Version of the built-in holiday calendar
pub const DEFAULT_CALENDAR_VERSION: &str = "2025-2026";

/// Colombian non-business days, 2025 and 2026.
///
/// Load a calendar file to cover later years.
pub const COLOMBIAN_HOLIDAYS: &[&str] = &[
    "2025-01-01",
    "2025-01-06",
    "2025-03-20",
    "2025-03-21",
    "2025-03-24",
    "2025-05-01",
    "2025-05-26",
    "2025-06-16",
    "2025-06-23",
    "2025-06-30",
    "2025-07-20",
    "2025-08-07",
    "2025-08-18",
    "2025-10-13",
    "2025-11-03",
    "2025-11-17",
    "2025-12-08",
    "2025-12-25",
    "2026-01-01",
    "2026-01-12",
    "2026-03-23",
    "2026-04-02",
    "2026-04-03",
    "2026-05-01",
    "2026-05-18",
    "2026-06-08",
    "2026-06-15",
    "2026-06-29",
    "2026-07-20",
    "2026-08-07",
    "2026-08-17",
    "2026-10-12",
    "2026-11-02",
    "2026-11-16",
    "2026-12-08",
    "2026-12-25",
];
