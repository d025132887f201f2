//! ICAO aircraft type designators.
//!
//! Each designator maps to the single-letter engine type (`J`et,
//! `T`urboprop, `P`iston, `E`lectric) and aircraft type (`L`andplane,
//! `S`eaplane, `A`mphibian, `H`elicopter, `G`yrocopter, `T`ilt-wing) that
//! type restrictions are written against.

/// Engine and airframe codes of an aircraft type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AircraftType {
    pub designator: &'static str,
    pub engine_type: char,
    pub aircraft_type: char,
}

const fn aircraft(
    designator: &'static str,
    engine_type: char,
    aircraft_type: char,
) -> AircraftType {
    AircraftType {
        designator,
        engine_type,
        aircraft_type,
    }
}

/// Known designators, sorted for binary search.
static AIRCRAFT: &[AircraftType] = &[
    aircraft("A124", 'J', 'L'),
    aircraft("A139", 'T', 'H'),
    aircraft("A19N", 'J', 'L'),
    aircraft("A20N", 'J', 'L'),
    aircraft("A21N", 'J', 'L'),
    aircraft("A306", 'J', 'L'),
    aircraft("A310", 'J', 'L'),
    aircraft("A318", 'J', 'L'),
    aircraft("A319", 'J', 'L'),
    aircraft("A320", 'J', 'L'),
    aircraft("A321", 'J', 'L'),
    aircraft("A332", 'J', 'L'),
    aircraft("A333", 'J', 'L'),
    aircraft("A338", 'J', 'L'),
    aircraft("A339", 'J', 'L'),
    aircraft("A342", 'J', 'L'),
    aircraft("A343", 'J', 'L'),
    aircraft("A345", 'J', 'L'),
    aircraft("A346", 'J', 'L'),
    aircraft("A359", 'J', 'L'),
    aircraft("A35K", 'J', 'L'),
    aircraft("A388", 'J', 'L'),
    aircraft("AS50", 'T', 'H'),
    aircraft("AT43", 'T', 'L'),
    aircraft("AT45", 'T', 'L'),
    aircraft("AT72", 'T', 'L'),
    aircraft("AT75", 'T', 'L'),
    aircraft("AT76", 'T', 'L'),
    aircraft("B190", 'T', 'L'),
    aircraft("B350", 'T', 'L'),
    aircraft("B38M", 'J', 'L'),
    aircraft("B39M", 'J', 'L'),
    aircraft("B712", 'J', 'L'),
    aircraft("B733", 'J', 'L'),
    aircraft("B734", 'J', 'L'),
    aircraft("B735", 'J', 'L'),
    aircraft("B736", 'J', 'L'),
    aircraft("B737", 'J', 'L'),
    aircraft("B738", 'J', 'L'),
    aircraft("B739", 'J', 'L'),
    aircraft("B744", 'J', 'L'),
    aircraft("B748", 'J', 'L'),
    aircraft("B752", 'J', 'L'),
    aircraft("B753", 'J', 'L'),
    aircraft("B762", 'J', 'L'),
    aircraft("B763", 'J', 'L'),
    aircraft("B764", 'J', 'L'),
    aircraft("B772", 'J', 'L'),
    aircraft("B77L", 'J', 'L'),
    aircraft("B77W", 'J', 'L'),
    aircraft("B788", 'J', 'L'),
    aircraft("B789", 'J', 'L'),
    aircraft("B78X", 'J', 'L'),
    aircraft("BCS1", 'J', 'L'),
    aircraft("BCS3", 'J', 'L'),
    aircraft("BE20", 'T', 'L'),
    aircraft("BE36", 'P', 'L'),
    aircraft("BE58", 'P', 'L'),
    aircraft("C130", 'T', 'L'),
    aircraft("C152", 'P', 'L'),
    aircraft("C172", 'P', 'L'),
    aircraft("C182", 'P', 'L'),
    aircraft("C208", 'T', 'L'),
    aircraft("C25A", 'J', 'L'),
    aircraft("C25B", 'J', 'L'),
    aircraft("C510", 'J', 'L'),
    aircraft("C525", 'J', 'L'),
    aircraft("C56X", 'J', 'L'),
    aircraft("C68A", 'J', 'L'),
    aircraft("C700", 'J', 'L'),
    aircraft("CL35", 'J', 'L'),
    aircraft("CL60", 'J', 'L'),
    aircraft("CRJ2", 'J', 'L'),
    aircraft("CRJ7", 'J', 'L'),
    aircraft("CRJ9", 'J', 'L'),
    aircraft("CRJX", 'J', 'L'),
    aircraft("DA40", 'P', 'L'),
    aircraft("DA42", 'P', 'L'),
    aircraft("DH8A", 'T', 'L'),
    aircraft("DH8B", 'T', 'L'),
    aircraft("DH8C", 'T', 'L'),
    aircraft("DH8D", 'T', 'L'),
    aircraft("DHC6", 'T', 'L'),
    aircraft("E135", 'J', 'L'),
    aircraft("E145", 'J', 'L'),
    aircraft("E170", 'J', 'L'),
    aircraft("E175", 'J', 'L'),
    aircraft("E190", 'J', 'L'),
    aircraft("E195", 'J', 'L'),
    aircraft("E290", 'J', 'L'),
    aircraft("E295", 'J', 'L'),
    aircraft("E35L", 'J', 'L'),
    aircraft("E545", 'J', 'L'),
    aircraft("E550", 'J', 'L'),
    aircraft("E55P", 'J', 'L'),
    aircraft("EC35", 'T', 'H'),
    aircraft("EC45", 'T', 'H'),
    aircraft("F2TH", 'J', 'L'),
    aircraft("F900", 'J', 'L'),
    aircraft("FA7X", 'J', 'L'),
    aircraft("FA8X", 'J', 'L'),
    aircraft("G280", 'J', 'L'),
    aircraft("GL5T", 'J', 'L'),
    aircraft("GL7T", 'J', 'L'),
    aircraft("GLEX", 'J', 'L'),
    aircraft("GLF4", 'J', 'L'),
    aircraft("GLF5", 'J', 'L'),
    aircraft("GLF6", 'J', 'L'),
    aircraft("H25B", 'J', 'L'),
    aircraft("JS41", 'T', 'L'),
    aircraft("LJ45", 'J', 'L'),
    aircraft("LJ75", 'J', 'L'),
    aircraft("P28A", 'P', 'L'),
    aircraft("P28R", 'P', 'L'),
    aircraft("P46T", 'T', 'L'),
    aircraft("PA28", 'P', 'L'),
    aircraft("PA31", 'P', 'L'),
    aircraft("PA34", 'P', 'L'),
    aircraft("PA46", 'P', 'L'),
    aircraft("PC12", 'T', 'L'),
    aircraft("PC24", 'J', 'L'),
    aircraft("R44", 'P', 'H'),
    aircraft("SF34", 'T', 'L'),
    aircraft("SR20", 'P', 'L'),
    aircraft("SR22", 'P', 'L'),
    aircraft("SW4", 'T', 'L'),
    aircraft("TBM7", 'T', 'L'),
    aircraft("TBM8", 'T', 'L'),
    aircraft("TBM9", 'T', 'L'),
    aircraft("V22", 'T', 'T'),
    aircraft("VELI", 'E', 'L'),
];

/// Look up an ICAO type designator such as `B738`.
pub fn lookup(designator: &str) -> Option<AircraftType> {
    AIRCRAFT
        .binary_search_by(|entry| entry.designator.cmp(designator))
        .ok()
        .map(|index| AIRCRAFT[index])
}
