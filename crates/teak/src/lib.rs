mod exec;

pub mod ins;
pub mod regs;
pub mod system;
pub mod ucode;

use crate::ins::Opcode;
use crate::regs::Registers;
use crate::system::{
    Bus, System,
    ahbm::{Direction, UnitSize},
    dma::Channel,
    icu::VectoredInterrupt,
    memory::MEMORY_WORDS,
};
use static_assertions::const_assert;

pub use ins::Ins;
pub use ucode::UcodeId;

const_assert!(MEMORY_WORDS.is_power_of_two());

/// Mask of the 18-bit program counter.
pub const PC_MASK: u32 = 0x3FFFF;

/// Number of hardware interrupt lines.
pub const INTERRUPT_LINES: usize = 3;

#[derive(Default)]
pub struct Interpreter {
    pub regs: Registers,
    /// Set by a relative branch to itself. While idle, [`Interpreter::run`] skips ahead to the
    /// next observable event.
    pub idle: bool,
    /// Target of the vectored interrupt latched into `ipv`.
    pub vectored: Option<VectoredInterrupt>,
}

type ExecFn = for<'a, 'b> fn(&'a mut Interpreter, &'b mut System, Ins);

const OPCODE_COUNT: usize = Opcode::Illegal as usize + 1;

static OPCODE_EXEC_LUT: [ExecFn; OPCODE_COUNT] = {
    let mut lut = [Interpreter::undefined as ExecFn; OPCODE_COUNT];

    lut[Opcode::Nop as usize] = Interpreter::nop as ExecFn;
    lut[Opcode::Norm as usize] = Interpreter::norm as ExecFn;
    lut[Opcode::Swap as usize] = Interpreter::swap as ExecFn;
    lut[Opcode::Trap as usize] = Interpreter::trap as ExecFn;
    lut[Opcode::AlmPage as usize] = Interpreter::alm_page as ExecFn;
    lut[Opcode::AlmRn as usize] = Interpreter::alm_rn as ExecFn;
    lut[Opcode::AlmReg as usize] = Interpreter::alm_reg as ExecFn;
    lut[Opcode::AlmR6Or as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6And as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Xor as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Add as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Tst0 as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Tst1 as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Cmp as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Sub as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Msu as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Addh as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Addl as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Subh as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Subl as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Sqr as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Sqra as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AlmR6Cmpu as usize] = Interpreter::alm_r6 as ExecFn;
    lut[Opcode::AluMem as usize] = Interpreter::alu as ExecFn;
    lut[Opcode::AluR7Mem as usize] = Interpreter::alu as ExecFn;
    lut[Opcode::AluImm as usize] = Interpreter::alu as ExecFn;
    lut[Opcode::AluImm8 as usize] = Interpreter::alu_imm8 as ExecFn;
    lut[Opcode::AluR7Short as usize] = Interpreter::alu as ExecFn;
    lut[Opcode::OrAbAx as usize] = Interpreter::or as ExecFn;
    lut[Opcode::OrAxBx as usize] = Interpreter::or as ExecFn;
    lut[Opcode::OrBxBx as usize] = Interpreter::or as ExecFn;
    lut[Opcode::AlbPage as usize] = Interpreter::alb_page as ExecFn;
    lut[Opcode::AlbRn as usize] = Interpreter::alb_rn as ExecFn;
    lut[Opcode::AlbReg as usize] = Interpreter::alb_reg as ExecFn;
    lut[Opcode::AlbR6 as usize] = Interpreter::alb_r6 as ExecFn;
    lut[Opcode::AlbSttModSet as usize] = Interpreter::alb_stt_mod as ExecFn;
    lut[Opcode::AlbSttModRst as usize] = Interpreter::alb_stt_mod as ExecFn;
    lut[Opcode::AlbSttModChng as usize] = Interpreter::alb_stt_mod as ExecFn;
    lut[Opcode::AlbSttModTst0 as usize] = Interpreter::alb_stt_mod as ExecFn;
    lut[Opcode::AlbSttModTst1 as usize] = Interpreter::alb_stt_mod as ExecFn;
    lut[Opcode::AddAbBx as usize] = Interpreter::add_acc as ExecFn;
    lut[Opcode::AddBxAx as usize] = Interpreter::add_acc as ExecFn;
    lut[Opcode::AddP1 as usize] = Interpreter::add_p1 as ExecFn;
    lut[Opcode::AddPx as usize] = Interpreter::add_px as ExecFn;
    lut[Opcode::SubAbBx as usize] = Interpreter::sub_acc as ExecFn;
    lut[Opcode::SubBxAx as usize] = Interpreter::sub_acc as ExecFn;
    lut[Opcode::SubP1 as usize] = Interpreter::sub_p1 as ExecFn;
    lut[Opcode::SubPx as usize] = Interpreter::sub_px as ExecFn;
    lut[Opcode::App0 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App1 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App2 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App3 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App4 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App5 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App6 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App7 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App8 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App9 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App10 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App11 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App12 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::App13 as usize] = Interpreter::app as ExecFn;
    lut[Opcode::AddAdd as usize] = Interpreter::add_add as ExecFn;
    lut[Opcode::AddSub as usize] = Interpreter::add_sub as ExecFn;
    lut[Opcode::SubAdd as usize] = Interpreter::sub_add as ExecFn;
    lut[Opcode::SubSub as usize] = Interpreter::sub_sub as ExecFn;
    lut[Opcode::AddSubSv as usize] = Interpreter::add_sub_sv as ExecFn;
    lut[Opcode::SubAddSv as usize] = Interpreter::sub_add_sv as ExecFn;
    lut[Opcode::SubAddIMovJSv as usize] = Interpreter::sub_add_i_mov_j_sv as ExecFn;
    lut[Opcode::SubAddJMovISv as usize] = Interpreter::sub_add_j_mov_i_sv as ExecFn;
    lut[Opcode::AddSubIMovJ as usize] = Interpreter::add_sub_i_mov_j as ExecFn;
    lut[Opcode::AddSubJMovI as usize] = Interpreter::add_sub_j_mov_i as ExecFn;
    lut[Opcode::MulRnImm as usize] = Interpreter::mul_rn_imm as ExecFn;
    lut[Opcode::MulY0Rn as usize] = Interpreter::mul_y0_rn as ExecFn;
    lut[Opcode::MulY0Reg as usize] = Interpreter::mul_y0_reg as ExecFn;
    lut[Opcode::MulR45R0123 as usize] = Interpreter::mul_r45_r0123 as ExecFn;
    lut[Opcode::MulY0R6 as usize] = Interpreter::mul_y0_r6 as ExecFn;
    lut[Opcode::MulY0Page as usize] = Interpreter::mul_y0_page as ExecFn;
    lut[Opcode::Mpyi as usize] = Interpreter::mpyi as ExecFn;
    lut[Opcode::MsuR45R0123 as usize] = Interpreter::msu_r45_r0123 as ExecFn;
    lut[Opcode::MsuRnImm as usize] = Interpreter::msu_rn_imm as ExecFn;
    lut[Opcode::Msusu as usize] = Interpreter::msusu as ExecFn;
    lut[Opcode::MacX1to0 as usize] = Interpreter::mac_x1to0 as ExecFn;
    lut[Opcode::Mac1 as usize] = Interpreter::mac1 as ExecFn;
    lut[Opcode::Moda4 as usize] = Interpreter::moda as ExecFn;
    lut[Opcode::Moda3 as usize] = Interpreter::moda as ExecFn;
    lut[Opcode::Pacr1 as usize] = Interpreter::pacr1 as ExecFn;
    lut[Opcode::Clr as usize] = Interpreter::clr as ExecFn;
    lut[Opcode::Clrr as usize] = Interpreter::clrr as ExecFn;
    lut[Opcode::BkrepImm8 as usize] = Interpreter::bkrep_imm8 as ExecFn;
    lut[Opcode::BkrepReg as usize] = Interpreter::bkrep_reg as ExecFn;
    lut[Opcode::BkrepR6 as usize] = Interpreter::bkrep_r6 as ExecFn;
    lut[Opcode::Bkreprst as usize] = Interpreter::bkreprst as ExecFn;
    lut[Opcode::BkreprstMemsp as usize] = Interpreter::bkreprst_memsp as ExecFn;
    lut[Opcode::Bkrepsto as usize] = Interpreter::bkrepsto as ExecFn;
    lut[Opcode::BkrepstoMemsp as usize] = Interpreter::bkrepsto_memsp as ExecFn;
    lut[Opcode::Banke as usize] = Interpreter::banke as ExecFn;
    lut[Opcode::Bankr as usize] = Interpreter::bankr as ExecFn;
    lut[Opcode::BankrAr as usize] = Interpreter::bankr_ar as ExecFn;
    lut[Opcode::BankrArArp as usize] = Interpreter::bankr_ar_arp as ExecFn;
    lut[Opcode::BankrArp as usize] = Interpreter::bankr_arp as ExecFn;
    lut[Opcode::Bitrev as usize] = Interpreter::bitrev as ExecFn;
    lut[Opcode::BitrevDbrv as usize] = Interpreter::bitrev_dbrv as ExecFn;
    lut[Opcode::BitrevEbrv as usize] = Interpreter::bitrev_ebrv as ExecFn;
    lut[Opcode::Br as usize] = Interpreter::br as ExecFn;
    lut[Opcode::Brr as usize] = Interpreter::brr as ExecFn;
    lut[Opcode::Break as usize] = Interpreter::break_ as ExecFn;
    lut[Opcode::Call as usize] = Interpreter::call as ExecFn;
    lut[Opcode::CallaAxl as usize] = Interpreter::calla_axl as ExecFn;
    lut[Opcode::CallaAx as usize] = Interpreter::calla_ax as ExecFn;
    lut[Opcode::Callr as usize] = Interpreter::callr as ExecFn;
    lut[Opcode::CntxS as usize] = Interpreter::cntx_s as ExecFn;
    lut[Opcode::CntxR as usize] = Interpreter::cntx_r as ExecFn;
    lut[Opcode::Ret as usize] = Interpreter::ret as ExecFn;
    lut[Opcode::Retd as usize] = Interpreter::delayed_return as ExecFn;
    lut[Opcode::Reti as usize] = Interpreter::reti as ExecFn;
    lut[Opcode::Retic as usize] = Interpreter::retic as ExecFn;
    lut[Opcode::Retid as usize] = Interpreter::delayed_return as ExecFn;
    lut[Opcode::Retidc as usize] = Interpreter::delayed_return as ExecFn;
    lut[Opcode::Rets as usize] = Interpreter::rets as ExecFn;
    lut[Opcode::LoadPs as usize] = Interpreter::load_ps as ExecFn;
    lut[Opcode::LoadStepi as usize] = Interpreter::load_stepi as ExecFn;
    lut[Opcode::LoadStepj as usize] = Interpreter::load_stepj as ExecFn;
    lut[Opcode::LoadPage as usize] = Interpreter::load_page as ExecFn;
    lut[Opcode::LoadModi as usize] = Interpreter::load_modi as ExecFn;
    lut[Opcode::LoadModj as usize] = Interpreter::load_modj as ExecFn;
    lut[Opcode::LoadMovpd as usize] = Interpreter::load_movpd as ExecFn;
    lut[Opcode::LoadPs01 as usize] = Interpreter::load_ps01 as ExecFn;
    lut[Opcode::PushImm as usize] = Interpreter::push_imm as ExecFn;
    lut[Opcode::PushReg as usize] = Interpreter::push_reg as ExecFn;
    lut[Opcode::PushAbe as usize] = Interpreter::push_abe as ExecFn;
    lut[Opcode::PushCfg as usize] = Interpreter::push_cfg as ExecFn;
    lut[Opcode::PushPrpage as usize] = Interpreter::push_prpage as ExecFn;
    lut[Opcode::PushPx as usize] = Interpreter::push_px as ExecFn;
    lut[Opcode::PushR6 as usize] = Interpreter::push_r6 as ExecFn;
    lut[Opcode::PushRepc as usize] = Interpreter::push_repc as ExecFn;
    lut[Opcode::PushX0 as usize] = Interpreter::push_x0 as ExecFn;
    lut[Opcode::PushX1 as usize] = Interpreter::push_x1 as ExecFn;
    lut[Opcode::PushY1 as usize] = Interpreter::push_y1 as ExecFn;
    lut[Opcode::PushaAx as usize] = Interpreter::pusha as ExecFn;
    lut[Opcode::PushaBx as usize] = Interpreter::pusha as ExecFn;
    lut[Opcode::PopReg as usize] = Interpreter::pop_reg as ExecFn;
    lut[Opcode::PopAbe as usize] = Interpreter::pop_abe as ExecFn;
    lut[Opcode::PopCfg as usize] = Interpreter::pop_reg as ExecFn;
    lut[Opcode::PopBx as usize] = Interpreter::pop_reg as ExecFn;
    lut[Opcode::PopPrpage as usize] = Interpreter::pop_prpage as ExecFn;
    lut[Opcode::PopPx as usize] = Interpreter::pop_px as ExecFn;
    lut[Opcode::PopR6 as usize] = Interpreter::pop_r6 as ExecFn;
    lut[Opcode::PopRepc as usize] = Interpreter::pop_repc as ExecFn;
    lut[Opcode::PopX0 as usize] = Interpreter::pop_x0 as ExecFn;
    lut[Opcode::PopX1 as usize] = Interpreter::pop_x1 as ExecFn;
    lut[Opcode::PopY1 as usize] = Interpreter::pop_y1 as ExecFn;
    lut[Opcode::Popa as usize] = Interpreter::popa as ExecFn;
    lut[Opcode::RepImm8 as usize] = Interpreter::rep_imm8 as ExecFn;
    lut[Opcode::RepReg as usize] = Interpreter::rep_reg as ExecFn;
    lut[Opcode::RepR6 as usize] = Interpreter::rep_r6 as ExecFn;
    lut[Opcode::Shfc as usize] = Interpreter::shfc as ExecFn;
    lut[Opcode::Shfi as usize] = Interpreter::shfi as ExecFn;
    lut[Opcode::Tst4b as usize] = Interpreter::tst4b as ExecFn;
    lut[Opcode::Tst4bAx as usize] = Interpreter::tst4b_ax as ExecFn;
    lut[Opcode::TstbPage as usize] = Interpreter::tstb_page as ExecFn;
    lut[Opcode::TstbRn as usize] = Interpreter::tstb_rn as ExecFn;
    lut[Opcode::TstbReg as usize] = Interpreter::tstb_reg as ExecFn;
    lut[Opcode::TstbR6 as usize] = Interpreter::tstb_r6 as ExecFn;
    lut[Opcode::TstbSttMod as usize] = Interpreter::tstb_stt_mod as ExecFn;
    lut[Opcode::And as usize] = Interpreter::and as ExecFn;
    lut[Opcode::Dint as usize] = Interpreter::dint as ExecFn;
    lut[Opcode::Eint as usize] = Interpreter::eint as ExecFn;
    lut[Opcode::ExpBx as usize] = Interpreter::exp_bx as ExecFn;
    lut[Opcode::ExpBxAx as usize] = Interpreter::exp_bx as ExecFn;
    lut[Opcode::ExpRn as usize] = Interpreter::exp_rn as ExecFn;
    lut[Opcode::ExpRnAx as usize] = Interpreter::exp_rn as ExecFn;
    lut[Opcode::ExpReg as usize] = Interpreter::exp_reg as ExecFn;
    lut[Opcode::ExpRegAx as usize] = Interpreter::exp_reg as ExecFn;
    lut[Opcode::ExpR6 as usize] = Interpreter::exp_r6 as ExecFn;
    lut[Opcode::ExpR6Ax as usize] = Interpreter::exp_r6 as ExecFn;
    lut[Opcode::Modr as usize] = Interpreter::modr as ExecFn;
    lut[Opcode::ModrDmod as usize] = Interpreter::modr_dmod as ExecFn;
    lut[Opcode::ModrI2 as usize] = Interpreter::modr_i2 as ExecFn;
    lut[Opcode::ModrI2Dmod as usize] = Interpreter::modr_i2_dmod as ExecFn;
    lut[Opcode::ModrD2 as usize] = Interpreter::modr_d2 as ExecFn;
    lut[Opcode::ModrD2Dmod as usize] = Interpreter::modr_d2_dmod as ExecFn;
    lut[Opcode::ModrEemod as usize] = Interpreter::modr_eemod as ExecFn;
    lut[Opcode::ModrEdmod as usize] = Interpreter::modr_edmod as ExecFn;
    lut[Opcode::ModrDemod as usize] = Interpreter::modr_demod as ExecFn;
    lut[Opcode::ModrDdmod as usize] = Interpreter::modr_ddmod as ExecFn;
    lut[Opcode::MovAbAb as usize] = Interpreter::mov_ab_ab as ExecFn;
    lut[Opcode::MovDvm as usize] = Interpreter::mov_dvm as ExecFn;
    lut[Opcode::MovX0 as usize] = Interpreter::mov_x0 as ExecFn;
    lut[Opcode::MovX1 as usize] = Interpreter::mov_x1 as ExecFn;
    lut[Opcode::MovY1 as usize] = Interpreter::mov_y1 as ExecFn;
    lut[Opcode::MovAblhPage as usize] = Interpreter::mov_reg_to_mem as ExecFn;
    lut[Opcode::MovAxlMem as usize] = Interpreter::mov_reg_to_mem as ExecFn;
    lut[Opcode::MovAxlR7Mem as usize] = Interpreter::mov_reg_to_mem as ExecFn;
    lut[Opcode::MovAxlR7Short as usize] = Interpreter::mov_reg_to_mem as ExecFn;
    lut[Opcode::MovMemAx as usize] = Interpreter::mov_mem_to_reg as ExecFn;
    lut[Opcode::MovPageAb as usize] = Interpreter::mov_mem_to_reg as ExecFn;
    lut[Opcode::MovPageAblh as usize] = Interpreter::mov_mem_to_reg as ExecFn;
    lut[Opcode::MovEu as usize] = Interpreter::mov_eu as ExecFn;
    lut[Opcode::MovPageRnOld as usize] = Interpreter::mov_mem_to_reg as ExecFn;
    lut[Opcode::MovSvPage as usize] = Interpreter::mov_sv_page as ExecFn;
    lut[Opcode::MovDvmTo as usize] = Interpreter::mov_dvm_to as ExecFn;
    lut[Opcode::MovIcrTo as usize] = Interpreter::mov_icr_to as ExecFn;
    lut[Opcode::MovImmBx as usize] = Interpreter::mov_imm as ExecFn;
    lut[Opcode::MovImmReg as usize] = Interpreter::mov_imm as ExecFn;
    lut[Opcode::MovIcrImm5 as usize] = Interpreter::mov_icr_imm5 as ExecFn;
    lut[Opcode::MovImm8sAxh as usize] = Interpreter::mov_imm as ExecFn;
    lut[Opcode::MovExt0 as usize] = Interpreter::mov_ext::<0> as ExecFn;
    lut[Opcode::MovExt1 as usize] = Interpreter::mov_ext::<1> as ExecFn;
    lut[Opcode::MovExt2 as usize] = Interpreter::mov_ext::<2> as ExecFn;
    lut[Opcode::MovExt3 as usize] = Interpreter::mov_ext::<3> as ExecFn;
    lut[Opcode::MovImm8sRnOld as usize] = Interpreter::mov_imm as ExecFn;
    lut[Opcode::MovSvImm8s as usize] = Interpreter::mov_sv_imm8s as ExecFn;
    lut[Opcode::MovImm8Axl as usize] = Interpreter::mov_imm as ExecFn;
    lut[Opcode::MovR7MemAx as usize] = Interpreter::mov_mem_to_reg as ExecFn;
    lut[Opcode::MovR7ShortAx as usize] = Interpreter::mov_mem_to_reg as ExecFn;
    lut[Opcode::MovRnBx as usize] = Interpreter::mov_rn_to_reg as ExecFn;
    lut[Opcode::MovRnReg as usize] = Interpreter::mov_rn_to_reg as ExecFn;
    lut[Opcode::MovMemspTo as usize] = Interpreter::mov_memsp_to as ExecFn;
    lut[Opcode::MovMixpToReg as usize] = Interpreter::mov_mixp_to as ExecFn;
    lut[Opcode::MovRnOldPage as usize] = Interpreter::mov_rn_old_page as ExecFn;
    lut[Opcode::MovIcrReg as usize] = Interpreter::mov_icr_reg as ExecFn;
    lut[Opcode::MovMixp as usize] = Interpreter::mov_mixp as ExecFn;
    lut[Opcode::MovRegRn as usize] = Interpreter::mov_reg_rn as ExecFn;
    lut[Opcode::MovRegBx as usize] = Interpreter::mov_reg_bx as ExecFn;
    lut[Opcode::MovRegReg as usize] = Interpreter::mov_reg_reg as ExecFn;
    lut[Opcode::MovRepcToAb as usize] = Interpreter::mov_repc_to as ExecFn;
    lut[Opcode::MovSvTo as usize] = Interpreter::mov_sv_to as ExecFn;
    lut[Opcode::MovX0To as usize] = Interpreter::mov_x0_to as ExecFn;
    lut[Opcode::MovX1To as usize] = Interpreter::mov_x1_to as ExecFn;
    lut[Opcode::MovY1To as usize] = Interpreter::mov_y1_to as ExecFn;
    lut[Opcode::MovImmArArp as usize] = Interpreter::mov_imm as ExecFn;
    lut[Opcode::MovR6Imm as usize] = Interpreter::mov_r6_imm as ExecFn;
    lut[Opcode::MovRepcImm as usize] = Interpreter::mov_repc_imm as ExecFn;
    lut[Opcode::MovStepi0 as usize] = Interpreter::mov_stepi0 as ExecFn;
    lut[Opcode::MovStepj0 as usize] = Interpreter::mov_stepj0 as ExecFn;
    lut[Opcode::MovImmSttMod as usize] = Interpreter::mov_imm as ExecFn;
    lut[Opcode::MovPrpageImm4 as usize] = Interpreter::mov_prpage_imm4 as ExecFn;
    lut[Opcode::Movd as usize] = Interpreter::movd as ExecFn;
    lut[Opcode::MovpAxlReg as usize] = Interpreter::movp_axl as ExecFn;
    lut[Opcode::MovpAxReg as usize] = Interpreter::movp_ax as ExecFn;
    lut[Opcode::MovpRnR0123 as usize] = Interpreter::movp_rn as ExecFn;
    lut[Opcode::Movpdw as usize] = Interpreter::movpdw as ExecFn;
    lut[Opcode::MovA0hStepi0 as usize] = Interpreter::mov_a0h_stepi0 as ExecFn;
    lut[Opcode::MovA0hStepj0 as usize] = Interpreter::mov_a0h_stepj0 as ExecFn;
    lut[Opcode::MovStepi0A0h as usize] = Interpreter::mov_stepi0_a0h as ExecFn;
    lut[Opcode::MovStepj0A0h as usize] = Interpreter::mov_stepj0_a0h as ExecFn;
    lut[Opcode::MovPrpageAbl as usize] = Interpreter::mov_prpage_abl as ExecFn;
    lut[Opcode::MovRepcAbl as usize] = Interpreter::mov_repc_abl as ExecFn;
    lut[Opcode::MovAblArArp as usize] = Interpreter::mov_abl_cfg as ExecFn;
    lut[Opcode::MovAblSttMod as usize] = Interpreter::mov_abl_cfg as ExecFn;
    lut[Opcode::MovPrpageTo as usize] = Interpreter::mov_prpage_to as ExecFn;
    lut[Opcode::MovRepcToAbl as usize] = Interpreter::mov_repc_to as ExecFn;
    lut[Opcode::MovArArpAbl as usize] = Interpreter::mov_cfg_abl as ExecFn;
    lut[Opcode::MovSttModAbl as usize] = Interpreter::mov_cfg_abl as ExecFn;
    lut[Opcode::MovRepcToAr as usize] = Interpreter::mov_repc_to_ar as ExecFn;
    lut[Opcode::MovArArpToAr as usize] = Interpreter::mov_cfg_to_ar as ExecFn;
    lut[Opcode::MovSttModToAr as usize] = Interpreter::mov_cfg_to_ar as ExecFn;
    lut[Opcode::MovRepcAr as usize] = Interpreter::mov_repc_ar as ExecFn;
    lut[Opcode::MovArToArArp as usize] = Interpreter::mov_ar_to_cfg as ExecFn;
    lut[Opcode::MovArToSttMod as usize] = Interpreter::mov_ar_to_cfg as ExecFn;
    lut[Opcode::MovRepcToR7Mem as usize] = Interpreter::mov_repc_to_r7 as ExecFn;
    lut[Opcode::MovCfgR7Mem as usize] = Interpreter::mov_cfg_r7 as ExecFn;
    lut[Opcode::MovRepcR7Mem as usize] = Interpreter::mov_repc_r7 as ExecFn;
    lut[Opcode::MovR7MemCfg as usize] = Interpreter::mov_r7_cfg as ExecFn;
    lut[Opcode::MovPcAx as usize] = Interpreter::mov_pc as ExecFn;
    lut[Opcode::MovPcBx as usize] = Interpreter::mov_pc as ExecFn;
    lut[Opcode::MovMixpToBx as usize] = Interpreter::mov_mixp_to as ExecFn;
    lut[Opcode::MovMixpR6 as usize] = Interpreter::mov_mixp_r6 as ExecFn;
    lut[Opcode::MovP0hToBx as usize] = Interpreter::mov_p0h_to as ExecFn;
    lut[Opcode::MovP0hR6 as usize] = Interpreter::mov_p0h_r6 as ExecFn;
    lut[Opcode::MovP0hToReg as usize] = Interpreter::mov_p0h_to as ExecFn;
    lut[Opcode::MovP0 as usize] = Interpreter::mov_p0 as ExecFn;
    lut[Opcode::MovP1To as usize] = Interpreter::mov_p1_to as ExecFn;
    lut[Opcode::Mov2PxMem as usize] = Interpreter::mov2_px_mem as ExecFn;
    lut[Opcode::Mov2s as usize] = Interpreter::mov2s as ExecFn;
    lut[Opcode::Mov2MemPx as usize] = Interpreter::mov2_mem_px as ExecFn;
    lut[Opcode::MovaAbMem as usize] = Interpreter::mova_ab_mem as ExecFn;
    lut[Opcode::MovaMemAb as usize] = Interpreter::mova_mem_ab as ExecFn;
    lut[Opcode::MovR6ToBx as usize] = Interpreter::mov_r6_to as ExecFn;
    lut[Opcode::MovR6Mixp as usize] = Interpreter::mov_r6_mixp as ExecFn;
    lut[Opcode::MovR6ToReg as usize] = Interpreter::mov_r6_to as ExecFn;
    lut[Opcode::MovR6Reg as usize] = Interpreter::mov_r6_reg as ExecFn;
    lut[Opcode::MovMemspR6 as usize] = Interpreter::mov_memsp_r6 as ExecFn;
    lut[Opcode::MovR6ToRn as usize] = Interpreter::mov_r6_to_rn as ExecFn;
    lut[Opcode::MovR6Rn as usize] = Interpreter::mov_r6_rn as ExecFn;
    lut[Opcode::MovsPage as usize] = Interpreter::movs_page as ExecFn;
    lut[Opcode::MovsRn as usize] = Interpreter::movs_rn as ExecFn;
    lut[Opcode::MovsReg as usize] = Interpreter::movs_reg as ExecFn;
    lut[Opcode::MovsR6To as usize] = Interpreter::movs_r6_to as ExecFn;
    lut[Opcode::Movsi as usize] = Interpreter::movsi as ExecFn;
    lut[Opcode::Mov2AxhMY0M as usize] = Interpreter::mov2_axh_m_y0_m as ExecFn;
    lut[Opcode::Mov2AxMij as usize] = Interpreter::mov2_ax_mij as ExecFn;
    lut[Opcode::Mov2AxMji as usize] = Interpreter::mov2_ax_mji as ExecFn;
    lut[Opcode::Mov2MijAx as usize] = Interpreter::mov2_mij_ax as ExecFn;
    lut[Opcode::Mov2MjiAx as usize] = Interpreter::mov2_mji_ax as ExecFn;
    lut[Opcode::Mov2AbhM as usize] = Interpreter::mov2_abh_m as ExecFn;
    lut[Opcode::ExchangeIaj as usize] = Interpreter::exchange_iaj as ExecFn;
    lut[Opcode::ExchangeRiaj as usize] = Interpreter::exchange_riaj as ExecFn;
    lut[Opcode::ExchangeJai as usize] = Interpreter::exchange_jai as ExecFn;
    lut[Opcode::ExchangeRjai as usize] = Interpreter::exchange_rjai as ExecFn;
    lut[Opcode::MovrAr as usize] = Interpreter::movr_ar as ExecFn;
    lut[Opcode::MovrRnAx as usize] = Interpreter::movr_rn as ExecFn;
    lut[Opcode::MovrRegAx as usize] = Interpreter::movr_reg as ExecFn;
    lut[Opcode::MovrBxAx as usize] = Interpreter::movr_bx as ExecFn;
    lut[Opcode::MovrR6To as usize] = Interpreter::movr_r6_to as ExecFn;
    lut[Opcode::Lim as usize] = Interpreter::lim as ExecFn;
    lut[Opcode::Vtrclr0 as usize] = Interpreter::vtrclr0 as ExecFn;
    lut[Opcode::Vtrclr1 as usize] = Interpreter::vtrclr1 as ExecFn;
    lut[Opcode::Vtrclr as usize] = Interpreter::vtrclr as ExecFn;
    lut[Opcode::Vtrmov0 as usize] = Interpreter::vtrmov0 as ExecFn;
    lut[Opcode::Vtrmov1 as usize] = Interpreter::vtrmov1 as ExecFn;
    lut[Opcode::Vtrmov as usize] = Interpreter::vtrmov as ExecFn;
    lut[Opcode::Vtrshr as usize] = Interpreter::vtrshr as ExecFn;
    lut[Opcode::Clrp0 as usize] = Interpreter::clrp0 as ExecFn;
    lut[Opcode::Clrp1 as usize] = Interpreter::clrp1 as ExecFn;
    lut[Opcode::Clrp as usize] = Interpreter::clrp as ExecFn;
    lut[Opcode::MaxGe as usize] = Interpreter::max_ge as ExecFn;
    lut[Opcode::MaxGt as usize] = Interpreter::max_gt as ExecFn;
    lut[Opcode::MinLe as usize] = Interpreter::min_le as ExecFn;
    lut[Opcode::MinLt as usize] = Interpreter::min_lt as ExecFn;
    lut[Opcode::MaxGeR0 as usize] = Interpreter::max_ge_r0 as ExecFn;
    lut[Opcode::MaxGtR0 as usize] = Interpreter::max_gt_r0 as ExecFn;
    lut[Opcode::MinLeR0 as usize] = Interpreter::min_le_r0 as ExecFn;
    lut[Opcode::MinLtR0 as usize] = Interpreter::min_lt_r0 as ExecFn;
    lut[Opcode::Divs as usize] = Interpreter::divs as ExecFn;
    lut[Opcode::SqrSqrAdd3 as usize] = Interpreter::sqr_sqr_add3 as ExecFn;
    lut[Opcode::SqrSqrAdd3Mem as usize] = Interpreter::sqr_sqr_add3_mem as ExecFn;
    lut[Opcode::SqrMpysuAdd3a as usize] = Interpreter::sqr_mpysu_add3a as ExecFn;
    lut[Opcode::CmpAxBx as usize] = Interpreter::cmp as ExecFn;
    lut[Opcode::CmpB0B1 as usize] = Interpreter::cmp_b0_b1 as ExecFn;
    lut[Opcode::CmpB1B0 as usize] = Interpreter::cmp_b1_b0 as ExecFn;
    lut[Opcode::CmpBxAx as usize] = Interpreter::cmp as ExecFn;
    lut[Opcode::CmpP1To as usize] = Interpreter::cmp_p1_to as ExecFn;
    lut[Opcode::Max2Vtr as usize] = Interpreter::max2_vtr as ExecFn;
    lut[Opcode::Min2Vtr as usize] = Interpreter::min2_vtr as ExecFn;
    lut[Opcode::Max2VtrBx as usize] = Interpreter::max2_vtr as ExecFn;
    lut[Opcode::Min2VtrBx as usize] = Interpreter::min2_vtr as ExecFn;
    lut[Opcode::Max2VtrMovlAx as usize] = Interpreter::max2_vtr_movl as ExecFn;
    lut[Opcode::Max2VtrMovhAx as usize] = Interpreter::max2_vtr_movh as ExecFn;
    lut[Opcode::Max2VtrMovlBx as usize] = Interpreter::max2_vtr_movl as ExecFn;
    lut[Opcode::Max2VtrMovhBx as usize] = Interpreter::max2_vtr_movh as ExecFn;
    lut[Opcode::Min2VtrMovlAx as usize] = Interpreter::min2_vtr_movl as ExecFn;
    lut[Opcode::Min2VtrMovhAx as usize] = Interpreter::min2_vtr_movh as ExecFn;
    lut[Opcode::Min2VtrMovlBx as usize] = Interpreter::min2_vtr_movl as ExecFn;
    lut[Opcode::Min2VtrMovhBx as usize] = Interpreter::min2_vtr_movh as ExecFn;
    lut[Opcode::Max2VtrMovij as usize] = Interpreter::max2_vtr_movij as ExecFn;
    lut[Opcode::Max2VtrMovji as usize] = Interpreter::max2_vtr_movji as ExecFn;
    lut[Opcode::Min2VtrMovij as usize] = Interpreter::min2_vtr_movij as ExecFn;
    lut[Opcode::Min2VtrMovji as usize] = Interpreter::min2_vtr_movji as ExecFn;
    lut[Opcode::MovSvApp0 as usize] = Interpreter::mov_sv_app as ExecFn;
    lut[Opcode::MovSvApp1 as usize] = Interpreter::mov_sv_app as ExecFn;
    lut[Opcode::MovSvApp2 as usize] = Interpreter::mov_sv_app as ExecFn;
    lut[Opcode::MovSvApp3 as usize] = Interpreter::mov_sv_app as ExecFn;
    lut[Opcode::MovSvApp4 as usize] = Interpreter::mov_sv_app as ExecFn;
    lut[Opcode::MovSvApp5 as usize] = Interpreter::mov_sv_app as ExecFn;
    lut[Opcode::MovSvApp6 as usize] = Interpreter::mov_sv_app as ExecFn;
    lut[Opcode::MovSvApp7 as usize] = Interpreter::mov_sv_app as ExecFn;
    lut[Opcode::MovSvApp8 as usize] = Interpreter::mov_sv_app as ExecFn;
    lut[Opcode::MovSvApp9 as usize] = Interpreter::mov_sv_app as ExecFn;
    lut[Opcode::CbsAxh as usize] = Interpreter::cbs_axh as ExecFn;
    lut[Opcode::CbsAxhBxh as usize] = Interpreter::cbs_axh_bxh as ExecFn;
    lut[Opcode::CbsArp as usize] = Interpreter::cbs_arp as ExecFn;

    let mut op = Opcode::Mma0 as usize;
    while op <= Opcode::Mma17 as usize {
        lut[op] = Interpreter::mma_reg as ExecFn;
        op += 1;
    }

    while op <= Opcode::Mma54 as usize {
        lut[op] = Interpreter::mma_arp as ExecFn;
        op += 1;
    }

    lut[Opcode::MmaMxXy0 as usize] = Interpreter::mma_mx_xy as ExecFn;
    lut[Opcode::MmaMxXy1 as usize] = Interpreter::mma_mx_xy as ExecFn;
    lut[Opcode::MmaXyMx0 as usize] = Interpreter::mma_xy_mx as ExecFn;
    lut[Opcode::MmaXyMx1 as usize] = Interpreter::mma_xy_mx as ExecFn;

    let mut op = Opcode::MmaMyMy0 as usize;
    while op <= Opcode::MmaMyMy11 as usize {
        lut[op] = Interpreter::mma_my_my as ExecFn;
        op += 1;
    }

    while op <= Opcode::MmaMov5 as usize {
        lut[op] = Interpreter::mma_mov as ExecFn;
        op += 1;
    }

    lut[Opcode::MmaMov6 as usize] = Interpreter::mma_mov_ar as ExecFn;
    lut[Opcode::MmaMov7 as usize] = Interpreter::mma_mov_ar as ExecFn;
    lut[Opcode::Addhp as usize] = Interpreter::addhp as ExecFn;

    lut
};

impl Interpreter {
    /// Powers the core back on. Memory is owned by the [`System`] and reset separately.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[inline(always)]
    fn fetch(&mut self, sys: &mut System) -> u16 {
        let addr = self.regs.pc | ((self.regs.prpage as u32) << 18);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        sys.read_program(addr)
    }

    fn latch_interrupts(&mut self, sys: &mut System) {
        for line in 0..INTERRUPT_LINES {
            if sys.icu.take_pending(line) {
                self.regs.ip[line] = true;
            }
        }

        if let Some(vectored) = sys.icu.take_vectored() {
            self.regs.ipv = true;
            self.vectored = Some(vectored);
        }
    }

    fn check_repeats(&mut self) {
        let regs = &mut self.regs;
        if regs.rep {
            if regs.repc == 0 {
                regs.rep = false;
            } else {
                regs.repc -= 1;
                regs.pc = regs.pc.wrapping_sub(1);
            }
        }

        if regs.lp && regs.bcn > 0 {
            let frame = &mut regs.bkrep_stack[regs.bcn as usize - 1];
            if frame.end.wrapping_add(1) == regs.pc {
                if frame.lc == 0 {
                    regs.bcn -= 1;
                    regs.lp = regs.bcn != 0;
                } else {
                    frame.lc -= 1;
                    regs.pc = frame.start;
                }
            }
        }
    }

    fn enter_interrupt(&mut self, sys: &mut System, target: u32, context_switch: bool) {
        self.regs.ie = false;
        self.push_pc(sys);
        self.regs.pc = target;
        self.idle = false;
        if context_switch {
            self.context_store();
        }
    }

    fn service_interrupts(&mut self, sys: &mut System) {
        if !self.regs.ie || self.regs.rep {
            return;
        }

        let line = (0..INTERRUPT_LINES).find(|&i| self.regs.im[i] && self.regs.ip[i]);
        if let Some(line) = line {
            tracing::debug!("servicing interrupt line {line}");
            self.regs.ip[line] = false;
            let context_switch = self.regs.ic[line];
            self.enter_interrupt(sys, 0x0006 + 8 * line as u32, context_switch);
            return;
        }

        if self.regs.imv && self.regs.ipv {
            self.regs.ipv = false;
            let vectored = self.vectored.take().unwrap_or(VectoredInterrupt {
                address: 0,
                context_switch: false,
            });

            tracing::debug!("servicing vectored interrupt at 0x{:05X}", vectored.address);
            self.enter_interrupt(sys, vectored.address, vectored.context_switch);
        }
    }

    /// Executes a single instruction without latching or servicing interrupts.
    pub fn step(&mut self, sys: &mut System) {
        let mut ins = Ins::new(self.fetch(sys));
        let decoded = ins.decoded();
        if decoded.needs_extra {
            ins.extra = self.fetch(sys);
        }

        self.check_repeats();
        OPCODE_EXEC_LUT[decoded.opcode as usize](self, sys, ins);
    }

    /// Runs for exactly `cycles` cycles. Every instruction takes one cycle.
    pub fn run(&mut self, sys: &mut System, cycles: u64) {
        self.idle = false;

        let mut i = 0;
        while i < cycles {
            if self.idle {
                let skipped = sys.max_skip().min(cycles - i - 1);
                sys.skip(skipped);
                i += skipped;

                // one more tick so components can raise their interrupts
                if i < cycles - 1 {
                    i += 1;
                    sys.tick();
                }
            }

            self.latch_interrupts(sys);
            self.step(sys);
            self.service_interrupts(sys);
            sys.tick();

            i += 1;
        }
    }
}

/// A complete Teak core: the interpreter and everything around it.
#[derive(Default)]
pub struct Teak {
    interpreter: Interpreter,
    system: System,
}

impl Teak {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the power-on state of registers, memory and peripherals. Callbacks and the bus
    /// stay attached.
    pub fn reset(&mut self) {
        self.interpreter.reset();
        self.system.reset();
    }

    pub fn run(&mut self, cycles: u64) {
        self.interpreter.run(&mut self.system, cycles);
    }

    pub fn registers(&self) -> &Registers {
        &self.interpreter.regs
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.interpreter.regs
    }

    pub fn is_idle(&self) -> bool {
        self.interpreter.idle
    }

    /// The whole shared memory, program space first.
    pub fn shared_memory(&self) -> &[u8] {
        self.system.mem.as_bytes()
    }

    pub fn shared_memory_mut(&mut self) -> &mut [u8] {
        self.system.mem.as_mut_bytes()
    }

    pub fn program_read(&self, addr: u32) -> u16 {
        self.system.read_program(addr)
    }

    pub fn program_write(&mut self, addr: u32, value: u16) {
        self.system.write_program(addr, value);
    }

    pub fn data_read(&mut self, addr: u16, bypass_mmio: bool) -> u16 {
        self.system.read_data_with(addr, bypass_mmio)
    }

    pub fn data_write(&mut self, addr: u16, value: u16, bypass_mmio: bool) {
        self.system.write_data_with(addr, value, bypass_mmio);
    }

    pub fn data_read_a32(&self, addr: u32) -> u16 {
        self.system.read_data_a32(addr)
    }

    pub fn data_write_a32(&mut self, addr: u32, value: u16) {
        self.system.write_data_a32(addr, value);
    }

    pub fn mmio_read(&mut self, offset: u16) -> u16 {
        self.system.read_mmio(offset)
    }

    pub fn mmio_write(&mut self, offset: u16, value: u16) {
        self.system.write_mmio(offset, value);
    }

    /// Fills a CPU to DSP data channel. If the DSP has not consumed the previous value yet,
    /// it is overwritten.
    pub fn send_data(&mut self, channel: usize, value: u16) {
        self.system.send_data(channel, value);
    }

    /// Whether the DSP has consumed the last value sent on `channel`.
    pub fn send_data_is_empty(&self, channel: usize) -> bool {
        !self.system.apbp_from_cpu.is_ready(channel)
    }

    /// Takes the value of a DSP to CPU data channel.
    pub fn recv_data(&mut self, channel: usize) -> u16 {
        self.system.apbp_from_dsp.recv(channel)
    }

    pub fn peek_recv_data(&self, channel: usize) -> u16 {
        self.system.apbp_from_dsp.peek(channel)
    }

    pub fn recv_data_is_ready(&self, channel: usize) -> bool {
        self.system.apbp_from_dsp.is_ready(channel)
    }

    /// Raises CPU to DSP semaphore bits.
    pub fn set_semaphore(&mut self, bits: u16) {
        self.system.set_semaphore(bits);
    }

    /// Clears DSP to CPU semaphore bits.
    pub fn clear_semaphore(&mut self, bits: u16) {
        self.system.apbp_from_dsp.clear_semaphore(bits);
    }

    pub fn mask_semaphore(&mut self, bits: u16) {
        self.system.apbp_from_dsp.mask_semaphore(bits);
    }

    /// DSP to CPU semaphore.
    pub fn semaphore(&self) -> u16 {
        self.system.apbp_from_dsp.semaphore
    }

    pub fn set_recv_data_handler(&mut self, channel: usize, handler: impl FnMut() + 'static) {
        self.system.callbacks.recv_data[channel] = Some(Box::new(handler));
    }

    pub fn set_semaphore_handler(&mut self, handler: impl FnMut() + 'static) {
        self.system.callbacks.semaphore = Some(Box::new(handler));
    }

    pub fn set_audio_callback(&mut self, callback: impl FnMut([i16; 2]) + 'static) {
        self.system.callbacks.audio = Some(Box::new(callback));
    }

    /// Attaches the memory reached through the AHBM.
    pub fn set_bus(&mut self, bus: impl Bus + 'static) {
        self.system.bus = Box::new(bus);
    }

    /// Host-driven audio frame exchange. Returns the frame of the first audio port.
    pub fn sample_clock(&mut self, input: i16) -> [i16; 2] {
        self.system.sample_clock(input)
    }

    pub fn ahbm_unit_size(&self, unit: usize) -> UnitSize {
        self.system.ahbm.units[unit].unit_size
    }

    pub fn ahbm_direction(&self, unit: usize) -> Direction {
        self.system.ahbm.units[unit].direction
    }

    pub fn ahbm_dma_channel(&self, unit: usize) -> u16 {
        self.system.ahbm.units[unit].dma_channel
    }

    pub fn ahbm_read16(&mut self, addr: u32) -> u16 {
        let System { ahbm, bus, .. } = &mut self.system;
        ahbm.read16(bus.as_mut(), 0, addr)
    }

    pub fn ahbm_read32(&mut self, addr: u32) -> u32 {
        let System { ahbm, bus, .. } = &mut self.system;
        ahbm.read32(bus.as_mut(), 0, addr)
    }

    pub fn ahbm_write16(&mut self, addr: u32, value: u16) {
        let System { ahbm, bus, .. } = &mut self.system;
        ahbm.write16(bus.as_mut(), 0, addr, value);
    }

    pub fn ahbm_write32(&mut self, addr: u32, value: u32) {
        let System { ahbm, bus, .. } = &mut self.system;
        ahbm.write32(bus.as_mut(), 0, addr, value);
    }

    pub fn dma_channel(&self, channel: usize) -> &Channel {
        &self.system.dma.channels[channel]
    }

    pub fn dma_channel0_src_high(&self) -> u16 {
        self.system.dma.channels[0].src_high
    }

    pub fn dma_channel0_dst_high(&self) -> u16 {
        self.system.dma.channels[0].dst_high
    }

    /// Identifies the ucode resident in program memory.
    pub fn identify_ucode(&self) -> UcodeId {
        let program = &self.shared_memory()[..ucode::PROGRAM_VIEW_LEN];
        ucode::identify(program)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    /// `brr -1`
    const HALT: u16 = 0x57F0;

    fn load(teak: &mut Teak, code: &[u16]) {
        for (addr, word) in code.iter().enumerate() {
            teak.program_write(addr as u32, *word);
        }
    }

    #[test]
    fn run_consumes_exact_budget() {
        let mut teak = Teak::new();
        load(&mut teak, &[0x0000, 0x0000, HALT]);

        let timer = &mut teak.system.timers[0];
        timer.start_low = 0x86A0;
        timer.start_high = 0x0001;
        timer.write_config(1 << 10);
        assert_eq!(timer.counter, 100_000);

        teak.run(1234);
        assert!(teak.is_idle());
        assert_eq!(teak.registers().pc, 2);
        assert_eq!(teak.system.timers[0].counter, 100_000 - 1234);

        teak.run(0);
        assert_eq!(teak.system.timers[0].counter, 100_000 - 1234);

        teak.run(766);
        assert_eq!(teak.system.timers[0].counter, 100_000 - 2000);
    }

    #[test]
    fn every_word_executes() {
        let mut teak = Teak::new();
        for word in 0..=u16::MAX {
            teak.interpreter.reset();
            load(&mut teak, &[word, 0x0000]);
            teak.run(1);
        }
    }

    #[test]
    fn mmio_bypass() {
        let mut teak = Teak::new();
        teak.data_write(0x1000, 0xABCD, false);
        assert_eq!(teak.data_read(0x1000, true), 0xABCD);

        teak.data_write(0x801A, 0x1234, true);
        assert_eq!(teak.data_read(0x801A, true), 0x1234);
        assert_eq!(teak.data_read(0x801A, false), 0xC902);
    }

    #[test]
    fn mailbox_round_trip() {
        let received = Rc::new(Cell::new(0));
        let mut teak = Teak::new();
        teak.set_recv_data_handler(0, {
            let received = received.clone();
            move || received.set(received.get() + 1)
        });

        load(
            &mut teak,
            &[
                0x5E01, 0x80C2, // mov 0x80C2, r1
                0x1C61, // mov [r1], r3
                0x5E01, 0x80C0, // mov 0x80C0, r1
                0x1861, // mov r3, [r1]
                HALT,
            ],
        );

        assert!(teak.send_data_is_empty(0));
        teak.send_data(0, 0x1234);
        assert!(!teak.send_data_is_empty(0));
        assert!(!teak.recv_data_is_ready(0));

        teak.run(100);
        assert_eq!(teak.registers().r[3], 0x1234);
        assert!(teak.send_data_is_empty(0));
        assert!(teak.recv_data_is_ready(0));
        assert_eq!(received.get(), 1);

        assert_eq!(teak.peek_recv_data(0), 0x1234);
        assert_eq!(teak.recv_data(0), 0x1234);
        assert!(!teak.recv_data_is_ready(0));
    }

    #[test]
    fn semaphore_handler_fires_on_edges() {
        let fired = Rc::new(Cell::new(0));
        let mut teak = Teak::new();
        teak.set_semaphore_handler({
            let fired = fired.clone();
            move || fired.set(fired.get() + 1)
        });

        load(
            &mut teak,
            &[
                0x5E01, 0x80CC, // mov 0x80CC, r1
                0x5E02, 0x0001, // mov 1, r2
                0x1841, // mov r2, [r1]
                0x1841, // mov r2, [r1]
                HALT,
            ],
        );

        teak.run(100);
        assert_eq!(teak.semaphore(), 0x0001);
        assert_eq!(fired.get(), 1);

        teak.clear_semaphore(0x0001);
        teak.registers_mut().pc = 0;
        teak.run(100);
        assert_eq!(fired.get(), 2);
    }

    #[test]
    fn identify_is_stable() {
        let mut teak = Teak::new();
        let before = teak.identify_ucode();
        assert_eq!(before, UcodeId::Unknown);
        assert_eq!(teak.identify_ucode(), before);

        load(&mut teak, &[0x1234, 0x5678]);
        assert_eq!(teak.identify_ucode(), UcodeId::Unknown);
        assert_eq!(teak.program_read(1), 0x5678);
    }
}
