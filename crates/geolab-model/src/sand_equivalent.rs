//! Sand equivalent report ("equi arena").

use serde::{Deserialize, Serialize};

use crate::calc::{sand_equivalent_average, sand_equivalent_trials};
use crate::kind::FormKind;
use crate::lenient;
use crate::options::{AgitationMethod, Approver, Reviewer, SamplePreparation, SampleType, UNSET};
use crate::progress::{ProgressSummary, SectionStatus, display_number, has_text};
use crate::report::{Identity, Report, ReportField, TextFormat};
use crate::trials::{Reading, TrialArray};

/// Number of repeated trials in a sand equivalent test.
pub const TRIAL_COUNT: usize = 3;

/// A sand equivalent test report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandEquivalentReport {
    #[serde(rename = "muestra", deserialize_with = "lenient::text")]
    pub sample_code: String,
    #[serde(rename = "numero_ot", deserialize_with = "lenient::text")]
    pub work_order_code: String,
    #[serde(rename = "fecha_ensayo", deserialize_with = "lenient::text")]
    pub test_date: String,
    #[serde(rename = "realizado_por", deserialize_with = "lenient::text")]
    pub performed_by: String,

    #[serde(rename = "tipo_muestra")]
    pub sample_type: SampleType,
    #[serde(rename = "metodo_agitacion")]
    pub agitation_method: AgitationMethod,
    #[serde(rename = "preparacion_muestra")]
    pub sample_preparation: SamplePreparation,
    #[serde(rename = "temperatura_solucion_c", deserialize_with = "lenient::number")]
    pub solution_temperature_c: Reading,
    #[serde(rename = "masa_4_medidas_g", deserialize_with = "lenient::number")]
    pub four_measures_mass_g: Reading,

    #[serde(rename = "tiempo_saturacion_min")]
    pub saturation_time_min: TrialArray<TRIAL_COUNT>,
    #[serde(rename = "tiempo_agitacion_seg")]
    pub agitation_time_s: TrialArray<TRIAL_COUNT>,
    #[serde(rename = "tiempo_decantacion_min")]
    pub settling_time_min: TrialArray<TRIAL_COUNT>,
    /// Clay reading per trial (inches).
    #[serde(rename = "lectura_arcilla_in")]
    pub clay_reading_in: TrialArray<TRIAL_COUNT>,
    /// Sand reading per trial (inches).
    #[serde(rename = "lectura_arena_in")]
    pub sand_reading_in: TrialArray<TRIAL_COUNT>,
    /// Manual override of the average; the calculated value is used when empty.
    #[serde(
        rename = "equivalente_arena_promedio_pct",
        deserialize_with = "lenient::number"
    )]
    pub average_pct: Reading,

    #[serde(rename = "equipo_balanza_01g_codigo", deserialize_with = "lenient::code")]
    pub balance_code: String,
    #[serde(rename = "equipo_horno_110_codigo", deserialize_with = "lenient::code")]
    pub oven_code: String,
    #[serde(
        rename = "equipo_equivalente_arena_codigo",
        deserialize_with = "lenient::code"
    )]
    pub sand_equivalent_apparatus_code: String,
    #[serde(rename = "equipo_agitador_ea_codigo", deserialize_with = "lenient::code")]
    pub shaker_code: String,
    #[serde(rename = "equipo_termometro_codigo", deserialize_with = "lenient::code")]
    pub thermometer_code: String,
    #[serde(rename = "equipo_tamiz_no4_codigo", deserialize_with = "lenient::code")]
    pub no4_sieve_code: String,
    #[serde(rename = "observaciones", deserialize_with = "lenient::text")]
    pub notes: String,

    #[serde(rename = "revisado_por")]
    pub reviewed_by: Reviewer,
    #[serde(rename = "revisado_fecha", deserialize_with = "lenient::text")]
    pub reviewed_date: String,
    #[serde(rename = "aprobado_por")]
    pub approved_by: Approver,
    #[serde(rename = "aprobado_fecha", deserialize_with = "lenient::text")]
    pub approved_date: String,
}

impl Default for SandEquivalentReport {
    fn default() -> Self {
        Self {
            sample_code: String::new(),
            work_order_code: String::new(),
            test_date: String::new(),
            performed_by: String::new(),
            sample_type: SampleType::Unset,
            agitation_method: AgitationMethod::Unset,
            sample_preparation: SamplePreparation::Unset,
            solution_temperature_c: None,
            four_measures_mass_g: None,
            saturation_time_min: TrialArray::filled_with(10.0),
            agitation_time_s: TrialArray::filled_with(45.0),
            settling_time_min: TrialArray::filled_with(20.0),
            clay_reading_in: TrialArray::empty(),
            sand_reading_in: TrialArray::empty(),
            average_pct: None,
            balance_code: UNSET.to_string(),
            oven_code: UNSET.to_string(),
            sand_equivalent_apparatus_code: UNSET.to_string(),
            shaker_code: UNSET.to_string(),
            thermometer_code: UNSET.to_string(),
            no4_sieve_code: UNSET.to_string(),
            notes: String::new(),
            reviewed_by: Reviewer::Unset,
            reviewed_date: String::new(),
            approved_by: Approver::Unset,
            approved_date: String::new(),
        }
    }
}

/// Calculated values of a sand equivalent report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SandEquivalentDerived {
    /// `ceil(100 * sand / clay)` per trial.
    pub per_trial: [Option<f64>; TRIAL_COUNT],
    /// Ceiling of the mean of the non-null trial results.
    pub average: Option<f64>,
}

impl Report for SandEquivalentReport {
    const KIND: FormKind = FormKind::SandEquivalent;
    type Field = SandEquivalentField;
    type TrialField = SandEquivalentTrialField;
    type Derived = SandEquivalentDerived;

    fn derived(&self) -> SandEquivalentDerived {
        let per_trial = sand_equivalent_trials(&self.clay_reading_in, &self.sand_reading_in);
        let average = sand_equivalent_average(&per_trial);
        SandEquivalentDerived { per_trial, average }
    }

    fn submission(&self) -> Self {
        let mut submitted = self.clone();
        submitted.average_pct = self.average_pct.or(self.derived().average);
        submitted
    }

    fn progress(&self) -> ProgressSummary {
        let header = [&self.sample_code, &self.work_order_code, &self.performed_by];
        let header_filled = header.iter().filter(|v| has_text(v)).count();
        let average = self.derived().average;

        ProgressSummary::from_sections(vec![
            SectionStatus::new(
                "Header",
                header_filled == header.len(),
                Some(format!("{header_filled}/{}", header.len())),
            ),
            SectionStatus::new(
                "Conditions",
                self.sample_type.is_set()
                    && self.agitation_method.is_set()
                    && self.sample_preparation.is_set(),
                self.solution_temperature_c
                    .map(|t| format!("Temp: {} °C", display_number(t))),
            ),
            SectionStatus::new(
                "Trials",
                self.clay_reading_in.any() && self.sand_reading_in.any(),
                Some(match average {
                    Some(avg) => format!("SE avg: {}%", display_number(avg)),
                    None => "No result".to_string(),
                }),
            ),
            SectionStatus::new(
                "Equipment",
                has_text(&self.balance_code)
                    && has_text(&self.oven_code)
                    && has_text(&self.sand_equivalent_apparatus_code),
                Some(if has_text(&self.notes) {
                    "With notes".to_string()
                } else {
                    "No notes".to_string()
                }),
            ),
        ])
    }

    fn identity(&self) -> Identity<'_> {
        Identity {
            sample_code: &self.sample_code,
            work_order_code: &self.work_order_code,
            test_date: &self.test_date,
            performed_by: &self.performed_by,
        }
    }

    fn formatted_fields() -> &'static [(SandEquivalentField, TextFormat)] {
        &[
            (SandEquivalentField::SampleCode, TextFormat::SampleCode),
            (SandEquivalentField::WorkOrderCode, TextFormat::WorkOrder),
            (SandEquivalentField::TestDate, TextFormat::Date),
            (SandEquivalentField::ReviewedDate, TextFormat::Date),
            (SandEquivalentField::ApprovedDate, TextFormat::Date),
        ]
    }
}

/// Every field of [`SandEquivalentReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SandEquivalentField {
    SampleCode,
    WorkOrderCode,
    TestDate,
    PerformedBy,
    SampleType,
    AgitationMethod,
    SamplePreparation,
    SolutionTemperature,
    FourMeasuresMass,
    Trial(SandEquivalentTrialField),
    AveragePct,
    BalanceCode,
    OvenCode,
    SandEquivalentApparatusCode,
    ShakerCode,
    ThermometerCode,
    No4SieveCode,
    Notes,
    ReviewedBy,
    ReviewedDate,
    ApprovedBy,
    ApprovedDate,
}

impl ReportField for SandEquivalentField {
    fn wire_name(self) -> &'static str {
        match self {
            Self::SampleCode => "muestra",
            Self::WorkOrderCode => "numero_ot",
            Self::TestDate => "fecha_ensayo",
            Self::PerformedBy => "realizado_por",
            Self::SampleType => "tipo_muestra",
            Self::AgitationMethod => "metodo_agitacion",
            Self::SamplePreparation => "preparacion_muestra",
            Self::SolutionTemperature => "temperatura_solucion_c",
            Self::FourMeasuresMass => "masa_4_medidas_g",
            Self::Trial(trial) => trial.wire_name(),
            Self::AveragePct => "equivalente_arena_promedio_pct",
            Self::BalanceCode => "equipo_balanza_01g_codigo",
            Self::OvenCode => "equipo_horno_110_codigo",
            Self::SandEquivalentApparatusCode => "equipo_equivalente_arena_codigo",
            Self::ShakerCode => "equipo_agitador_ea_codigo",
            Self::ThermometerCode => "equipo_termometro_codigo",
            Self::No4SieveCode => "equipo_tamiz_no4_codigo",
            Self::Notes => "observaciones",
            Self::ReviewedBy => "revisado_por",
            Self::ReviewedDate => "revisado_fecha",
            Self::ApprovedBy => "aprobado_por",
            Self::ApprovedDate => "aprobado_fecha",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::SampleCode => "Sample",
            Self::WorkOrderCode => "Work order",
            Self::TestDate => "Test date",
            Self::PerformedBy => "Performed by",
            Self::SampleType => "Sample type",
            Self::AgitationMethod => "Agitation method",
            Self::SamplePreparation => "Sample preparation",
            Self::SolutionTemperature => "Solution temperature (°C)",
            Self::FourMeasuresMass => "Mass of 4 measures (g)",
            Self::Trial(trial) => trial.label(),
            Self::AveragePct => "Sand equivalent average (%)",
            Self::BalanceCode => "Balance 0.1 g",
            Self::OvenCode => "Oven 110 °C",
            Self::SandEquivalentApparatusCode => "Sand equivalent apparatus",
            Self::ShakerCode => "Shaker",
            Self::ThermometerCode => "Thermometer",
            Self::No4SieveCode => "Sieve No. 4",
            Self::Notes => "Notes",
            Self::ReviewedBy => "Reviewed by",
            Self::ReviewedDate => "Review date",
            Self::ApprovedBy => "Approved by",
            Self::ApprovedDate => "Approval date",
        }
    }
}

/// The per-trial fields of [`SandEquivalentReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SandEquivalentTrialField {
    SaturationTime,
    AgitationTime,
    SettlingTime,
    ClayReading,
    SandReading,
}

impl ReportField for SandEquivalentTrialField {
    fn wire_name(self) -> &'static str {
        match self {
            Self::SaturationTime => "tiempo_saturacion_min",
            Self::AgitationTime => "tiempo_agitacion_seg",
            Self::SettlingTime => "tiempo_decantacion_min",
            Self::ClayReading => "lectura_arcilla_in",
            Self::SandReading => "lectura_arena_in",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::SaturationTime => "Saturation time (min)",
            Self::AgitationTime => "Agitation time (s)",
            Self::SettlingTime => "Settling time (min)",
            Self::ClayReading => "Clay reading (in)",
            Self::SandReading => "Sand reading (in)",
        }
    }
}

impl From<SandEquivalentTrialField> for SandEquivalentField {
    fn from(value: SandEquivalentTrialField) -> Self {
        SandEquivalentField::Trial(value)
    }
}
