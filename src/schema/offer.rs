//! Field list of the offer template, version 1.
//!
//! Guidance strings are in Polish: they quote the labels of the source
//! documents so the model can locate each value.

use super::{FieldSpec, OfferSchema, SectionSpec};

pub static OFFER_SCHEMA: OfferSchema = OfferSchema {
    version: 1,
    sections: &[
        SectionSpec { name: "formInfo", fields: FORM_INFO_FIELDS },
        SectionSpec { name: "generalData", fields: GENERAL_DATA_FIELDS },
        SectionSpec { name: "connection", fields: CONNECTION_FIELDS },
        SectionSpec { name: "gpo", fields: GPO_FIELDS },
        SectionSpec { name: "powerTransformer", fields: POWER_TRANSFORMER_FIELDS },
        SectionSpec { name: "mvSwitchgear", fields: MV_SWITCHGEAR_FIELDS },
        SectionSpec { name: "mvTopology", fields: MV_TOPOLOGY_FIELDS },
        SectionSpec { name: "pvGeneration", fields: PV_GENERATION_FIELDS },
        SectionSpec { name: "windGeneration", fields: WIND_GENERATION_FIELDS },
        SectionSpec { name: "otherAtypicalRequirements", fields: OTHER_ATYPICAL_REQUIREMENTS_FIELDS },
        SectionSpec { name: "requiredScope", fields: REQUIRED_SCOPE_FIELDS },
        SectionSpec { name: "selections", fields: SELECTIONS_FIELDS },
    ],
};

const FORM_INFO_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("documentTitle", "Klucz: Tytuł dokumentu"),
    FieldSpec::text("documentVersion", "Klucz: Wersja dokumentu"),
    FieldSpec::text("projectCaretakersDPI", "Klucz: Opiekunowie projektu z ramienia DPI"),
    FieldSpec::text("projectCaretakersRealization", "Klucz: Opiekunowie projektu z ramienia Realizacji"),
    FieldSpec::text_list("updateDates", "Klucz: Daty aktualizacji"),
    FieldSpec::integer("version", "Klucz: Wersja"),
    FieldSpec::text("projectContract", "Klucz: Kontrakt na projekt"),
    FieldSpec::text("investor", "Klucz: Inwestor"),
    FieldSpec::text("offerMode", "Klucz: Tryb oferty"),
    FieldSpec::text("requiredCompletionDate", "Klucz: Wymagany termin realizacji"),
];

const GENERAL_DATA_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("connectionPower", "Klucz: Moc przyłączeniowa"),
    FieldSpec::text("maxPowerNcRfg", "Klucz: Moc maksymalna NcRfG"),
    FieldSpec::text("activePowerLimitPcc", "Klucz: Ograniczenie mocy czynnej w PCC"),
    FieldSpec::text("connectionVoltage", "Klucz: Napięcie przyłączenia"),
    FieldSpec::text("shortCircuitCurrentPcc", "Klucz: Prąd zwarciowy w PCC"),
    FieldSpec::text("otherImportantInfo", "Klucz: Inne ważne informacje"),
];

const CONNECTION_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("connectionLength", "Klucz: Długość przyłącza"),
    FieldSpec::text("cableSlackGuideline", "Klucz: Wytyczna dot. zapasu kabla"),
    FieldSpec::text("shortCircuitStrengthRequirements", "Klucz: Wymagania wytrzymałości zwarciowej"),
    FieldSpec::text("conductorMaterial", "Klucz: Materiał żyły roboczej"),
    FieldSpec::text("allowConductorGrading", "Klucz: Zgoda na stopniowanie żył roboczych"),
    FieldSpec::text("allowReturnConductorGrading", "Klucz: Zgoda na stopniowanie żył powrotnych"),
    FieldSpec::text("otherSpecialRequirements", "Klucz: Inne wymagania szczególne"),
    FieldSpec::text("allowedDailyLoadFactor", "Klucz: Dopuszczalny współczynnik obciążenia dobowego"),
    FieldSpec::text("maxLayingDepth", "Klucz: Maksymalna głębokość ułożenia"),
    FieldSpec::text("concreteBentoniteRequirement", "Klucz: Wymóg dot. betonu/bentonitu"),
    FieldSpec::text("otherObjectsLimitingLoad", "Klucz: Inne obiekty ograniczające obciążalność"),
    FieldSpec::text("otherConnectionNotes", "Klucz: Inne uwagi dot. przyłącza"),
];

const GPO_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("stationLayoutAndConditions", "Klucz: Układ i uwarunkowania stacji"),
    FieldSpec::text("compensationType", "Klucz: Rodzaj kompensacji"),
    FieldSpec::text("structureSolutions", "Klucz: Rozwiązania konstrukcyjne"),
    FieldSpec::text("switchgearType", "Klucz: Typ rozdzielnicy"),
    FieldSpec::text("otherGpoNotes", "Klucz: Inne uwagi dot. GPO"),
];

const POWER_TRANSFORMER_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("minPower", "Klucz: Moc minimalna"),
    FieldSpec::text("requiredShortCircuitVoltage", "Klucz: Wymagane napięcie zwarcia"),
    FieldSpec::text("requiredHvMvRatio", "Klucz: Wymagana przekładnia GN/SN"),
    FieldSpec::text("minTapChangerRange", "Klucz: Minimalny zakres przełącznika zaczepów"),
    FieldSpec::text("tapChangerType", "Klucz: Typ przełącznika zaczepów"),
    FieldSpec::text("insulationLevelHvMv", "Klucz: Poziom izolacji GN/SN"),
    FieldSpec::text("maxNoLoadLoadLosses", "Klucz: Maksymalne straty jałowe i obciążeniowe"),
    FieldSpec::text("coolingType", "Klucz: Rodzaj chłodzenia"),
    FieldSpec::text("bushingType", "Klucz: Typ izolatorów przepustowych"),
    FieldSpec::text("noLoadCurrent", "Klucz: Prąd stanu jałowego"),
    FieldSpec::text("otherTransformerNotes", "Klucz: Inne uwagi dot. transformatora"),
];

const MV_SWITCHGEAR_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("operatingMaxVoltage", "Klucz: Napięcie robocze maksymalne"),
    FieldSpec::text("shortCircuitStrengthAndTime", "Klucz: Wytrzymałość zwarciowa i czas"),
    FieldSpec::text("peakWithstandCurrent", "Klucz: Prąd znamionowy szczytowy wytrzymywany"),
    FieldSpec::text("busbarContinuousCurrent", "Klucz: Prąd znamionowy ciągły szyn zbiorczych"),
    FieldSpec::text("requiredBayTypesAndCount", "Klucz: Wymagane typy i liczba pól"),
    FieldSpec::text("requiredInsulationLevel", "Klucz: Wymagany poziom izolacji"),
    FieldSpec::text("recommendedSolutions", "Klucz: Rekomendowane rozwiązania"),
    FieldSpec::text("otherSwitchgearNotes", "Klucz: Inne uwagi dot. rozdzielnicy"),
];

const MV_TOPOLOGY_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("minConductorCrossSection", "Klucz: Minimalny przekrój żyły roboczej"),
    FieldSpec::text("maxConductorCrossSection", "Klucz: Maksymalny przekrój żyły roboczej"),
    FieldSpec::text("allowedDailyLoadFactorMv", "Klucz: Dopuszczalny współczynnik obciążenia dobowego SN"),
    FieldSpec::text("specialShortCircuitRequirements", "Klucz: Specjalne wymagania dot. zwarć"),
    FieldSpec::text("conductorMaterialMv", "Klucz: Materiał żyły roboczej SN"),
    FieldSpec::text("minCableLayingDepth", "Klucz: Minimalna głębokość ułożenia kabli"),
    FieldSpec::text("cableSlackGuidelineMv", "Klucz: Wytyczna dot. zapasu kabla SN"),
    FieldSpec::text("maxVoltageDropPowerLoss", "Klucz: Maksymalny spadek napięcia/straty mocy"),
    FieldSpec::text("neutralPointGroundingMethod", "Klucz: Sposób pracy punktu neutralnego"),
    FieldSpec::text("returnConductorShortCircuitStrength", "Klucz: Wytrzymałość zwarciowa żyły powrotnej"),
    FieldSpec::text("otherTopologyNotes", "Klucz: Inne uwagi dot. topologii SN"),
];

const PV_GENERATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("inverterTypeAndCount", "Klucz: Typ i liczba falowników"),
    FieldSpec::text("panelTypeAndCount", "Klucz: Typ i liczba paneli"),
    FieldSpec::text("deviationsFromConditions", "Klucz: Odstępstwa od warunków"),
    FieldSpec::text("pvStationTypeCountAndPower", "Klucz: Typ, liczba i moc stacji PV"),
    FieldSpec::text("topologyDrawingFile", "Klucz: Plik z rysunkiem topologii"),
    FieldSpec::text("allowNighttimeReactivePower", "Klucz: Zgoda na nocną generację mocy biernej"),
    FieldSpec::text("allowReactivePowerRegulation", "Klucz: Zgoda na regulację mocy biernej"),
    FieldSpec::text("pvsystSimulationParameters", "Klucz: Parametry symulacji PVsyst"),
    FieldSpec::text("constructionType", "Klucz: Rodzaj konstrukcji"),
    FieldSpec::text("preferredTableDimensions", "Klucz: Preferowane wymiary stołów"),
    FieldSpec::text("otherRequirements", "Klucz: Inne wymagania"),
    FieldSpec::text("projectLayoutMapFile", "Klucz: Plik z mapą layoutu projektu"),
    FieldSpec::text("preferredPanelWiring", "Klucz: Preferowany sposób łączenia paneli"),
    FieldSpec::text("permissibleInstallationParametersDS", "Klucz: Dopuszczalne parametry zabudowy DS"),
    FieldSpec::text("permissibleInstallationParametersWZ", "Klucz: Dopuszczalne parametry zabudowy WZ"),
    FieldSpec::text("preferredDcAcRatio", "Klucz: Preferowany współczynnik DC/AC"),
    FieldSpec::text("otherPvGenerationNotes", "Klucz: Inne uwagi dot. generacji PV"),
];

const WIND_GENERATION_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("turbineTypeAndCount", "Klucz: Typ i liczba turbin"),
    FieldSpec::text("fwTopologyDrawingFile", "Klucz: Plik z rysunkiem topologii FW"),
    FieldSpec::text("turbineReactivePowerCapability", "Klucz: Zdolność generacji mocy biernej turbin"),
    FieldSpec::text("reactivePowerLimitations", "Klucz: Ograniczenia w generacji mocy biernej"),
    FieldSpec::text("activePowerCurtailment", "Klucz: Ograniczenie mocy czynnej"),
    FieldSpec::text("turbineTransformerData", "Klucz: Dane transformatora turbinowego"),
    FieldSpec::text("maxMvCrossSectionToTurbine", "Klucz: Maksymalny przekrój SN do turbiny"),
    FieldSpec::text("otherWindGenerationNotes", "Klucz: Inne uwagi dot. generacji FW"),
];

const OTHER_ATYPICAL_REQUIREMENTS_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("preferredManufacturers", "Klucz: Preferowani producenci"),
    FieldSpec::text("otherNotes", "Klucz: Inne uwagi"),
];

const INTERNAL_MV_CABLE_COLUMNS: &[FieldSpec] = &[
    FieldSpec::text("from", "Kolumna w tabeli: od"),
    FieldSpec::text("to", "Kolumna w tabeli: do"),
    FieldSpec::number("routeLengthKm", "Kolumna w tabeli: [km]"),
    FieldSpec::integer("inverterCount", "Kolumna w tabeli: Liczba falowników na stację"),
    FieldSpec::number("powerMva", "Kolumna w tabeli: Moc (MVA)"),
    FieldSpec::number("currentA", "Kolumna w tabeli: A"),
    FieldSpec::integer("conductorCrossSectionMm2", "Kolumna w tabeli: mm2 (Srobocza)"),
    FieldSpec::integer("returnCrossSectionMm2", "Kolumna w tabeli: mm2 (Spowrt)"),
    FieldSpec::integer("coresPerPhase", "Kolumna w tabeli: szt."),
];

const REQUIRED_SCOPE_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("tableLengthRequest", "Klucz: Wniosek dot. długości stołów"),
    FieldSpec::text("mvLvStationQuantityCheck", "Klucz: Sprawdzenie ilości stacji SN/nn"),
    FieldSpec::text("inverterQuantityCheck", "Klucz: Sprawdzenie ilości falowników"),
    FieldSpec::text("internalMvLineCheck", "Klucz: Sprawdzenie wewnętrznych linii SN"),
    FieldSpec::text("internalMvCableNotes", "Klucz: Uwagi do kabli SN wewnętrznych"),
    FieldSpec::table("internalMvCables", INTERNAL_MV_CABLE_COLUMNS, "Tabela: Kable SN wewnętrzne"),
    FieldSpec::text("dcCableQuantityAndCrossSectionRequest", "Klucz: Wniosek o ilość i przekroje kabli DC"),
    FieldSpec::text("acCableQuantityAndCrossSectionRequest", "Klucz: Wniosek o ilość i przekroje kabli AC"),
    FieldSpec::text("cableJointsConceptCheck", "Klucz: Sprawdzenie koncepcji muf kablowych"),
    FieldSpec::text("powerEvacuationMvLineCheck", "Klucz: Sprawdzenie linii SN wyprowadzenia mocy"),
    FieldSpec::text("newConceptRequest", "Klucz: Wniosek o nową koncepcję"),
    FieldSpec::text("tableAndStringLengthForNewPanelsRequest", "Klucz: Wniosek o długość stołów i stringów dla nowych paneli"),
    FieldSpec::text("dcCableQuantityAndCrossSectionRequestNew", "Klucz: Wniosek o ilość i przekroje kabli DC (nowe)"),
    FieldSpec::text("acCableQuantityAndCrossSectionRequestNew", "Klucz: Wniosek o ilość i przekroje kabli AC (nowe)"),
    FieldSpec::text("mvLvStationQuantityCheckNew", "Klucz: Sprawdzenie ilości stacji SN/nn (nowe)"),
    FieldSpec::text("inverterQuantityCheckNew", "Klucz: Sprawdzenie ilości falowników (nowe)"),
    FieldSpec::text("reactivePowerRegulationNote", "Klucz: Uwaga dot. regulacji mocy biernej"),
];

const SELECTIONS_FIELDS: &[FieldSpec] = &[
    FieldSpec::text("description", "Opis sekcji"),
    FieldSpec::text("selectionA", "Klucz: Dobór A"),
    FieldSpec::text("selectionB", "Klucz: Dobór B"),
];
